//! Temporary workspaces and stub gateway builders for CLI tests.

use super::*;
use crate::alert::{AlertConfig, AlertGateways, AlertGatewayBuilder};
use crate::routes::{RoutesArgs, RoutesConfig, RoutesGateways, RoutesGatewayBuilder};
use camino::Utf8PathBuf;
use geo::Coord;
use safepath_core::test_support::{
    RecordingChannel, StubGeocoder, StubReverseGeocoder, StubRouter, sample_route,
};
use safepath_core::{GeocodeError, Route};
use tempfile::TempDir;

pub(super) const ORIGIN_LAT: f64 = 51.505;
pub(super) const ORIGIN_LON: f64 = -0.09;

pub(super) const TWO_CONTACTS: &str = r#"[
  { "name": "Mum", "phone": "+44 7700 900001" },
  { "name": "Ravi", "phone": "+44 7700 900003", "relationship": "Brother" }
]"#;

pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path(name);
        safepath_fs::write_utf8(&path, contents).expect("write workspace file");
        path
    }
}

/// Three routes scoring 70, 30 and 30 once ranked.
pub(super) fn three_routes() -> Vec<Route> {
    vec![
        sample_route(1_000.0, 4),
        sample_route(2_000.0, 20),
        sample_route(1_000.0, 4),
    ]
}

pub(super) fn routes_args(destination: &str) -> RoutesArgs {
    RoutesArgs {
        destination: Some(destination.to_owned()),
        origin_lat: Some(ORIGIN_LAT),
        origin_lon: Some(ORIGIN_LON),
        ..RoutesArgs::default()
    }
}

pub(super) struct StubRoutesBuilder {
    routes: Vec<Route>,
    destination_known: bool,
}

impl StubRoutesBuilder {
    pub(super) fn with_routes(routes: Vec<Route>) -> Self {
        Self {
            routes,
            destination_known: true,
        }
    }

    pub(super) fn unknown_destination() -> Self {
        Self {
            routes: three_routes(),
            destination_known: false,
        }
    }
}

impl RoutesGatewayBuilder for StubRoutesBuilder {
    fn build(&self, _config: &RoutesConfig) -> Result<RoutesGateways, CliError> {
        let geocoder = if self.destination_known {
            StubGeocoder::found(Coord { x: -0.08, y: 51.51 }, "Bank, London")
        } else {
            StubGeocoder::not_found()
        };
        Ok(RoutesGateways {
            geocoder: Box::new(geocoder),
            router: Box::new(StubRouter::with_routes(self.routes.clone())),
        })
    }
}

#[derive(Default)]
pub(super) struct StubAlertBuilder {
    address_unavailable: bool,
    channel_failure: Option<String>,
}

impl StubAlertBuilder {
    pub(super) fn address_unavailable() -> Self {
        Self {
            address_unavailable: true,
            channel_failure: None,
        }
    }

    pub(super) fn failing_channel(message: &str) -> Self {
        Self {
            address_unavailable: false,
            channel_failure: Some(message.to_owned()),
        }
    }
}

impl AlertGatewayBuilder for StubAlertBuilder {
    fn build(&self, _config: &AlertConfig) -> Result<AlertGateways, CliError> {
        let reverse_geocoder = if self.address_unavailable {
            StubReverseGeocoder::failing(GeocodeError::Unavailable {
                message: "offline".into(),
            })
        } else {
            StubReverseGeocoder::address("Bank, London")
        };
        let channel = match &self.channel_failure {
            Some(message) => RecordingChannel::failing(message),
            None => RecordingChannel::default(),
        };
        Ok(AlertGateways {
            reverse_geocoder: Box::new(reverse_geocoder),
            channel: Box::new(channel),
        })
    }
}
