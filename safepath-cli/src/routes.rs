//! Routes command implementation for the SafePath CLI.

use async_trait::async_trait;
use camino::Utf8PathBuf;
use clap::Parser;
use geo::Coord;
use log::{debug, info};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use safepath_core::{
    GeocodeGateway, LayerHandle, Route, RoutingError, RoutingGateway, SafetyLevel, SearchSession,
    SelectionController,
};
use safepath_data::geocode::{DEFAULT_NOMINATIM_URL, NominatimGateway};
use safepath_data::routing::{DEFAULT_OSRM_URL, DEFAULT_PROFILE, OsrmConfig, OsrmRoutingGateway};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::render::LogRenderer;
use crate::{
    ARG_DESTINATION, ARG_NOMINATIM_URL, ARG_ORIGIN_LAT, ARG_ORIGIN_LON, ARG_OSRM_URL, ARG_OUTPUT,
    ARG_PROFILE, ARG_SELECT, CliError, ENV_DESTINATION, ENV_ORIGIN_LAT, ENV_ORIGIN_LON,
    current_thread_runtime, require_latitude, require_longitude, write_json,
};

/// CLI arguments for the `routes` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Geocode a destination, fetch alternative routes from an \
                 OSRM server and print them ranked safest first. The safest \
                 route is selected unless --select picks another.",
    about = "Find routes and rank them by safety"
)]
#[ortho_config(prefix = "SAFEPATH")]
pub(crate) struct RoutesArgs {
    /// Destination address to geocode.
    #[arg(value_name = "destination")]
    #[serde(default)]
    pub(crate) destination: Option<String>,
    /// Latitude of the starting point.
    #[arg(long = ARG_ORIGIN_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) origin_lat: Option<f64>,
    /// Longitude of the starting point.
    #[arg(long = ARG_ORIGIN_LON, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) origin_lon: Option<f64>,
    /// Index of the ranked route to select instead of the safest.
    #[arg(long = ARG_SELECT, value_name = "index")]
    #[serde(default)]
    pub(crate) select: Option<usize>,
    /// Base URL for the Nominatim geocoder.
    #[arg(long = ARG_NOMINATIM_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_url: Option<String>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_url: Option<String>,
    /// OSRM routing profile, e.g. "driving" or "foot".
    #[arg(long = ARG_PROFILE, value_name = "name")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Write the ranked routes to this file instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl RoutesArgs {
    pub(crate) fn into_config(self) -> Result<RoutesConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RoutesConfig::try_from(merged)
    }
}

/// Resolved `routes` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RoutesConfig {
    pub(crate) origin: Coord<f64>,
    pub(crate) destination: String,
    pub(crate) select: Option<usize>,
    pub(crate) nominatim_url: String,
    pub(crate) osrm_url: String,
    pub(crate) profile: String,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<RoutesArgs> for RoutesConfig {
    type Error = CliError;

    fn try_from(args: RoutesArgs) -> Result<Self, Self::Error> {
        let lat = args.origin_lat.ok_or(CliError::MissingArgument {
            field: ARG_ORIGIN_LAT,
            env: ENV_ORIGIN_LAT,
        })?;
        let lon = args.origin_lon.ok_or(CliError::MissingArgument {
            field: ARG_ORIGIN_LON,
            env: ENV_ORIGIN_LON,
        })?;
        let destination = args
            .destination
            .filter(|destination| !destination.trim().is_empty())
            .ok_or(CliError::MissingPositional {
                field: ARG_DESTINATION,
                env: ENV_DESTINATION,
            })?;

        Ok(Self {
            origin: Coord {
                x: require_longitude(lon, ARG_ORIGIN_LON)?,
                y: require_latitude(lat, ARG_ORIGIN_LAT)?,
            },
            destination,
            select: args.select,
            nominatim_url: args
                .nominatim_url
                .unwrap_or_else(|| DEFAULT_NOMINATIM_URL.to_owned()),
            osrm_url: args
                .osrm_url
                .unwrap_or_else(|| DEFAULT_OSRM_URL.to_owned()),
            profile: args.profile.unwrap_or_else(|| DEFAULT_PROFILE.to_owned()),
            output: args.output,
        })
    }
}

/// Gateways used by one `routes` invocation.
pub(crate) struct RoutesGateways {
    pub(crate) geocoder: Box<dyn GeocodeGateway>,
    pub(crate) router: Box<dyn RoutingGateway>,
}

/// Builds the gateways for the current routes invocation.
pub(crate) trait RoutesGatewayBuilder {
    fn build(&self, config: &RoutesConfig) -> Result<RoutesGateways, CliError>;
}

pub(crate) struct DefaultRoutesGatewayBuilder;

impl RoutesGatewayBuilder for DefaultRoutesGatewayBuilder {
    fn build(&self, config: &RoutesConfig) -> Result<RoutesGateways, CliError> {
        let geocoder = NominatimGateway::new(config.nominatim_url.clone()).map_err(|source| {
            CliError::BuildGateway {
                base_url: config.nominatim_url.clone(),
                source,
            }
        })?;
        let router = OsrmRoutingGateway::with_config(
            OsrmConfig::new(config.osrm_url.clone()).with_profile(config.profile.clone()),
        )
        .map_err(|source| CliError::BuildGateway {
            base_url: config.osrm_url.clone(),
            source,
        })?;
        Ok(RoutesGateways {
            geocoder: Box::new(geocoder),
            router: Box::new(router),
        })
    }
}

/// Assigns every fetched route a layer handle in arrival order, standing in
/// for the map front end that would draw them.
pub(crate) struct LayeredRouter<'a> {
    pub(crate) inner: &'a dyn RoutingGateway,
}

#[async_trait(?Send)]
impl RoutingGateway for LayeredRouter<'_> {
    async fn find_routes(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Vec<Route>, RoutingError> {
        let routes = self.inner.find_routes(origin, destination).await?;
        Ok(routes
            .into_iter()
            .zip(0_u64..)
            .map(|(route, layer)| route.with_layer(LayerHandle(layer)))
            .collect())
    }
}

/// One ranked route as printed by the `routes` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RouteSummary {
    pub(crate) index: usize,
    pub(crate) score: u8,
    pub(crate) level: SafetyLevel,
    pub(crate) label: String,
    pub(crate) color: String,
    pub(crate) reasons: Vec<String>,
    pub(crate) distance: String,
    pub(crate) time: String,
    pub(crate) distance_meters: f64,
    pub(crate) time_seconds: f64,
    pub(crate) selected: bool,
}

/// Output of the `routes` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RoutesReport {
    pub(crate) destination: String,
    pub(crate) selected: Option<usize>,
    pub(crate) routes: Vec<RouteSummary>,
}

impl RoutesReport {
    fn from_controller(destination: String, controller: &SelectionController<LogRenderer>) -> Self {
        let selected = controller.selected_index();
        let routes = controller
            .routes()
            .map(|ranked| {
                ranked
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| {
                        let level = entry.safety.level();
                        RouteSummary {
                            index,
                            score: entry.safety.score(),
                            level,
                            label: level.label().to_owned(),
                            color: entry.safety.color().to_owned(),
                            reasons: entry
                                .safety
                                .reasons()
                                .iter()
                                .map(|reason| (*reason).to_owned())
                                .collect(),
                            distance: entry.route.distance_label(),
                            time: entry.route.duration_label(),
                            distance_meters: entry.route.total_distance_meters(),
                            time_seconds: entry.route.total_time_seconds(),
                            selected: selected == Some(index),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            destination,
            selected,
            routes,
        }
    }
}

pub(crate) fn run_routes(args: RoutesArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultRoutesGatewayBuilder;
    run_routes_with(args, &builder, &mut stdout)
}

pub(crate) fn run_routes_with(
    args: RoutesArgs,
    builder: &dyn RoutesGatewayBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_routes(&config, builder)?;
    match &config.output {
        Some(path) => {
            let payload =
                serde_json::to_string_pretty(&report).map_err(CliError::SerialiseOutput)?;
            safepath_fs::write_utf8(path, &format!("{payload}\n")).map_err(|source| {
                CliError::WriteOutputFile {
                    path: path.clone(),
                    source,
                }
            })?;
            info!("wrote {} ranked routes to {path}", report.routes.len());
            Ok(())
        }
        None => write_json(writer, &report),
    }
}

pub(crate) fn execute_routes(
    config: &RoutesConfig,
    builder: &dyn RoutesGatewayBuilder,
) -> Result<RoutesReport, CliError> {
    let gateways = builder.build(config)?;
    let router = LayeredRouter {
        inner: gateways.router.as_ref(),
    };
    let mut session = SearchSession::new(LogRenderer::default());
    session.set_origin(config.origin);

    let runtime = current_thread_runtime()?;
    let status = runtime.block_on(session.search(
        &config.destination,
        gateways.geocoder.as_ref(),
        &router,
    ))?;
    debug!("search finished: {status:?}");

    if let Some(index) = config.select {
        session.select_route(index);
    }
    debug!(
        "renderer received {} style commands",
        session.controller().renderer().restyles()
    );
    Ok(RoutesReport::from_controller(
        config.destination.clone(),
        session.controller(),
    ))
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RoutesConfig, CliError> {
    let merged = RoutesArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RoutesConfig::try_from(merged)
}
