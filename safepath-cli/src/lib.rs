//! Command-line interface for searching safety-ranked routes and raising
//! emergency alerts.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use std::io::Write;

mod alert;
mod error;
mod render;
mod routes;

pub use error::CliError;

use alert::AlertArgs;
use routes::RoutesArgs;

pub(crate) const ARG_ORIGIN_LAT: &str = "origin-lat";
pub(crate) const ARG_ORIGIN_LON: &str = "origin-lon";
pub(crate) const ARG_DESTINATION: &str = "destination";
pub(crate) const ARG_SELECT: &str = "select";
pub(crate) const ARG_NOMINATIM_URL: &str = "nominatim-url";
pub(crate) const ARG_OSRM_URL: &str = "osrm-url";
pub(crate) const ARG_PROFILE: &str = "profile";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ENV_ORIGIN_LAT: &str = "SAFEPATH_CMDS_ROUTES_ORIGIN_LAT";
pub(crate) const ENV_ORIGIN_LON: &str = "SAFEPATH_CMDS_ROUTES_ORIGIN_LON";
pub(crate) const ENV_DESTINATION: &str = "SAFEPATH_CMDS_ROUTES_DESTINATION";

pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_LON: &str = "lon";
pub(crate) const ARG_CONTACTS: &str = "contacts";
pub(crate) const ARG_USER_NAME: &str = "user-name";
pub(crate) const ENV_LAT: &str = "SAFEPATH_CMDS_ALERT_LAT";
pub(crate) const ENV_LON: &str = "SAFEPATH_CMDS_ALERT_LON";
pub(crate) const ENV_CONTACTS: &str = "SAFEPATH_CMDS_ALERT_CONTACTS";

/// Name used in alerts when none is configured.
pub(crate) const DEFAULT_USER_NAME: &str = "SafePath User";

/// Run the SafePath CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when argument parsing, configuration or the selected
/// command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Routes(args) => routes::run_routes(args),
        Command::Alert(args) => alert::run_alert(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "safepath",
    about = "Safety-ranked route search and emergency alerts",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Find routes to a destination and rank them by safety.
    Routes(RoutesArgs),
    /// Send an emergency alert with the current location to your contacts.
    Alert(AlertArgs),
}

/// Check a latitude lies in `-90..=90`.
pub(crate) fn require_latitude(value: f64, field: &'static str) -> Result<f64, CliError> {
    if value.is_finite() && (-90.0..=90.0).contains(&value) {
        Ok(value)
    } else {
        Err(CliError::InvalidCoordinate { field, value })
    }
}

/// Check a longitude lies in `-180..=180`.
pub(crate) fn require_longitude(value: f64, field: &'static str) -> Result<f64, CliError> {
    if value.is_finite() && (-180.0..=180.0).contains(&value) {
        Ok(value)
    } else {
        Err(CliError::InvalidCoordinate { field, value })
    }
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match safepath_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Single-threaded runtime driving the `?Send` gateway futures.
pub(crate) fn current_thread_runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}

/// Pretty-print `value` as JSON followed by a newline.
pub(crate) fn write_json<T: serde::Serialize>(
    writer: &mut dyn Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
