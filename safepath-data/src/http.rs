//! Shared HTTP client plumbing for the gateway adapters.

use std::time::Duration;

use reqwest::Client;
use safepath_core::TransportError;
use thiserror::Error;

/// Default user agent sent with every request.
///
/// Nominatim's usage policy rejects requests without an identifying agent.
pub const DEFAULT_USER_AGENT: &str = "safepath-engine/0.1";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while constructing a gateway.
#[derive(Debug, Error)]
pub enum GatewayBuildError {
    /// The base URL could not be parsed.
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        /// URL as configured.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

pub(crate) fn build_client(
    user_agent: &str,
    timeout: Duration,
) -> Result<Client, GatewayBuildError> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(GatewayBuildError::HttpClient)
}

pub(crate) fn parse_base_url(base_url: &str) -> Result<url::Url, GatewayBuildError> {
    // A trailing slash keeps `Url::join` from replacing the last segment.
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    url::Url::parse(&normalised).map_err(|source| GatewayBuildError::InvalidBaseUrl {
        url: base_url.to_owned(),
        source,
    })
}

/// Convert a reqwest error into a [`TransportError`].
pub(crate) fn convert_reqwest_error(
    error: &reqwest::Error,
    url: &str,
    timeout: Duration,
) -> TransportError {
    if error.is_timeout() {
        return TransportError::Timeout {
            url: url.to_owned(),
            timeout_secs: timeout.as_secs(),
        };
    }

    if let Some(status) = error.status() {
        return TransportError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    if error.is_decode() {
        return TransportError::Parse {
            message: error.to_string(),
        };
    }

    TransportError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

/// GET `url` and decode the JSON body as `T`.
pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
    client: &Client,
    url: &url::Url,
    timeout: Duration,
) -> Result<T, TransportError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|err| convert_reqwest_error(&err, url.as_str(), timeout))?
        .error_for_status()
        .map_err(|err| convert_reqwest_error(&err, url.as_str(), timeout))?;

    response.json().await.map_err(|err| TransportError::Parse {
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://osrm.test", "http://osrm.test/")]
    #[case("http://osrm.test/", "http://osrm.test/")]
    #[case("https://host/api/v1//", "https://host/api/v1/")]
    fn base_url_gains_single_trailing_slash(#[case] input: &str, #[case] expected: &str) {
        let url = parse_base_url(input).expect("valid url");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn invalid_base_url_is_rejected() {
        let err = parse_base_url("not a url").expect_err("invalid");
        assert!(matches!(err, GatewayBuildError::InvalidBaseUrl { .. }));
    }
}
