//! Error types returned by the geocoding and routing gateways.

use thiserror::Error;

/// Failures talking to a remote service, shared by every gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },
    /// The request could not be sent or the connection failed.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse service response: {message}")]
    Parse {
        /// Error detail.
        message: String,
    },
}

/// Errors from [`GeocodeGateway`](super::GeocodeGateway) and
/// [`ReverseGeocodeGateway`](super::ReverseGeocodeGateway).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The service found no match for the query.
    #[error("no location matches {query:?}")]
    NotFound {
        /// Address text that was searched.
        query: String,
    },
    /// The service reported that it cannot answer.
    #[error("geocoding service unavailable: {message}")]
    Unavailable {
        /// Error detail.
        message: String,
    },
    /// Transport-level failure.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors from [`RoutingGateway::find_routes`](super::RoutingGateway::find_routes).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The routing service returned an error code.
    #[error("routing service returned {code}: {message}")]
    Service {
        /// Service status code, e.g. `"NoRoute"`.
        code: String,
        /// Error detail.
        message: String,
    },
    /// Transport-level failure.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
