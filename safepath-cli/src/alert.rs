//! Alert command implementation for the SafePath CLI.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use geo::Coord;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use safepath_core::{
    Ack, AlertMessage, AlertReceipt, AlertRequest, EmergencyContact, NotificationChannel,
    NotificationError, ReverseGeocodeGateway, send_emergency_alert,
};
use safepath_data::geocode::{DEFAULT_NOMINATIM_URL, NominatimGateway};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::{
    ARG_CONTACTS, ARG_LAT, ARG_LON, ARG_NOMINATIM_URL, ARG_USER_NAME, CliError,
    DEFAULT_USER_NAME, ENV_CONTACTS, ENV_LAT, ENV_LON, current_thread_runtime, require_existing,
    require_latitude, require_longitude, write_json,
};

/// CLI arguments for the `alert` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Share the given location with every emergency contact in \
                 a JSON contacts file. The address is looked up through \
                 Nominatim and falls back to \"Unknown location\".",
    about = "Send an emergency alert to your contacts"
)]
#[ortho_config(prefix = "SAFEPATH")]
pub(crate) struct AlertArgs {
    /// Latitude of the current location.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the current location.
    #[arg(long = ARG_LON, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Path to a JSON array of emergency contacts.
    #[arg(long = ARG_CONTACTS, value_name = "path")]
    #[serde(default)]
    pub(crate) contacts: Option<Utf8PathBuf>,
    /// Name shown in the alert.
    #[arg(long = ARG_USER_NAME, value_name = "name")]
    #[serde(default)]
    pub(crate) user_name: Option<String>,
    /// Base URL for the Nominatim reverse geocoder.
    #[arg(long = ARG_NOMINATIM_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_url: Option<String>,
}

impl AlertArgs {
    pub(crate) fn into_config(self) -> Result<AlertConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AlertConfig::try_from(merged)
    }
}

/// Resolved `alert` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AlertConfig {
    pub(crate) location: Coord<f64>,
    pub(crate) contacts: Utf8PathBuf,
    pub(crate) user_name: String,
    pub(crate) nominatim_url: String,
}

impl AlertConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.contacts, ARG_CONTACTS)
    }
}

impl TryFrom<AlertArgs> for AlertConfig {
    type Error = CliError;

    fn try_from(args: AlertArgs) -> Result<Self, Self::Error> {
        let lat = args.lat.ok_or(CliError::MissingArgument {
            field: ARG_LAT,
            env: ENV_LAT,
        })?;
        let lon = args.lon.ok_or(CliError::MissingArgument {
            field: ARG_LON,
            env: ENV_LON,
        })?;
        let contacts = args.contacts.ok_or(CliError::MissingArgument {
            field: ARG_CONTACTS,
            env: ENV_CONTACTS,
        })?;
        let user_name = args
            .user_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_owned());

        Ok(Self {
            location: Coord {
                x: require_longitude(lon, ARG_LON)?,
                y: require_latitude(lat, ARG_LAT)?,
            },
            contacts,
            user_name,
            nominatim_url: args
                .nominatim_url
                .unwrap_or_else(|| DEFAULT_NOMINATIM_URL.to_owned()),
        })
    }
}

/// `NotificationChannel` that writes each alert to the log.
///
/// Stands in for an SMS provider; every contact counts as delivered.
#[derive(Debug, Default)]
pub(crate) struct LogNotificationChannel;

#[async_trait(?Send)]
impl NotificationChannel for LogNotificationChannel {
    async fn send(
        &self,
        contacts: &[EmergencyContact],
        message: &AlertMessage,
    ) -> Result<Ack, NotificationError> {
        let body = message.body();
        for contact in contacts {
            info!("alert to {} <{}>:\n{body}", contact.name, contact.phone);
        }
        Ok(Ack {
            delivered: contacts.len(),
        })
    }
}

/// Gateways used by one `alert` invocation.
pub(crate) struct AlertGateways {
    pub(crate) reverse_geocoder: Box<dyn ReverseGeocodeGateway>,
    pub(crate) channel: Box<dyn NotificationChannel>,
}

/// Builds the gateways for the current alert invocation.
pub(crate) trait AlertGatewayBuilder {
    fn build(&self, config: &AlertConfig) -> Result<AlertGateways, CliError>;
}

pub(crate) struct DefaultAlertGatewayBuilder;

impl AlertGatewayBuilder for DefaultAlertGatewayBuilder {
    fn build(&self, config: &AlertConfig) -> Result<AlertGateways, CliError> {
        let geocoder = NominatimGateway::new(config.nominatim_url.clone()).map_err(|source| {
            CliError::BuildGateway {
                base_url: config.nominatim_url.clone(),
                source,
            }
        })?;
        Ok(AlertGateways {
            reverse_geocoder: Box::new(geocoder),
            channel: Box::new(LogNotificationChannel),
        })
    }
}

pub(crate) fn run_alert(args: AlertArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultAlertGatewayBuilder;
    run_alert_with(args, &builder, &mut stdout)
}

pub(crate) fn run_alert_with(
    args: AlertArgs,
    builder: &dyn AlertGatewayBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let receipt = execute_alert(args, builder)?;
    info!("{}", receipt.summary);
    write_json(writer, &receipt)
}

fn execute_alert(
    args: AlertArgs,
    builder: &dyn AlertGatewayBuilder,
) -> Result<AlertReceipt, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let contacts = load_contacts(&config.contacts)?;
    let gateways = builder.build(&config)?;
    let request = AlertRequest {
        user_name: config.user_name,
        location: Some(config.location),
        contacts,
    };
    let runtime = current_thread_runtime()?;
    let receipt = runtime.block_on(send_emergency_alert(
        &request,
        gateways.reverse_geocoder.as_ref(),
        gateways.channel.as_ref(),
    ))?;
    Ok(receipt)
}

/// Loads a JSON array of [`EmergencyContact`]s from disk.
pub(crate) fn load_contacts(path: &Utf8Path) -> Result<Vec<EmergencyContact>, CliError> {
    let text = safepath_fs::read_utf8(path).map_err(|source| CliError::ReadContacts {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::ParseContacts {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<AlertConfig, CliError> {
    let merged = AlertArgs::merge_from_layers(layers).map_err(CliError::from)?;
    AlertConfig::try_from(merged)
}
