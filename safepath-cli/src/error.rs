//! Error types emitted by the SafePath CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use safepath_core::{AlertError, SearchError};
use safepath_data::GatewayBuildError;
use thiserror::Error;

/// Errors emitted by the SafePath CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A required positional argument is missing after configuration merging.
    #[error("missing {field} (pass it as an argument or set {env})")]
    MissingPositional {
        field: &'static str,
        env: &'static str,
    },
    /// A latitude or longitude is not a finite value in its valid range.
    #[error("{field} value {value} is not a valid coordinate")]
    InvalidCoordinate { field: &'static str, value: f64 },
    /// A referenced input path does not exist on disk or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Reading the contacts file failed.
    #[error("failed to read contacts at {path:?}: {source}")]
    ReadContacts {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Contacts JSON could not be decoded.
    #[error("failed to parse contacts JSON at {path:?}: {source}")]
    ParseContacts {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Constructing an HTTP gateway failed.
    #[error("failed to build gateway for {base_url:?}: {source}")]
    BuildGateway {
        base_url: String,
        #[source]
        source: GatewayBuildError,
    },
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The route search failed.
    #[error("route search failed: {0}")]
    Search(#[from] SearchError),
    /// The emergency alert could not be sent.
    #[error(transparent)]
    Alert(#[from] AlertError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output to stdout failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// Writing command output to a file failed.
    #[error("failed to write output to {path:?}: {source}")]
    WriteOutputFile {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}
