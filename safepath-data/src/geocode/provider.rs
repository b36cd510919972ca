//! Nominatim-backed geocoding gateways.

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use log::debug;
use reqwest::Client;
use safepath_core::{GeocodeError, GeocodeGateway, Place, ReverseGeocodeGateway, TransportError};

use super::nominatim::{ReverseResponse, SearchHit, parse_coord};
use crate::http::{build_client, get_json, parse_base_url};
use crate::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, GatewayBuildError};

/// Public OpenStreetMap Nominatim instance.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Configuration for [`NominatimGateway`].
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim service.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl NominatimConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Forward and reverse geocoder using the Nominatim API.
#[derive(Debug)]
pub struct NominatimGateway {
    client: Client,
    base: url::Url,
    config: NominatimConfig,
}

impl NominatimGateway {
    /// Create a gateway with default settings for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayBuildError> {
        Self::with_config(NominatimConfig::new(base_url))
    }

    /// Create a gateway with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn with_config(config: NominatimConfig) -> Result<Self, GatewayBuildError> {
        let base = parse_base_url(&config.base_url)?;
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            client,
            base,
            config,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &NominatimConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, TransportError> {
        self.base.join(path).map_err(|err| TransportError::Network {
            url: format!("{}{path}", self.base),
            message: err.to_string(),
        })
    }

    /// `{base}/search?format=json&q={address}&limit=1`.
    fn build_search_url(&self, address: &str) -> Result<url::Url, TransportError> {
        let mut url = self.endpoint("search")?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", address)
            .append_pair("limit", "1");
        Ok(url)
    }

    /// `{base}/reverse?format=json&lat={lat}&lon={lon}`.
    fn build_reverse_url(&self, location: Coord<f64>) -> Result<url::Url, TransportError> {
        let mut url = self.endpoint("reverse")?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("lat", &location.y.to_string())
            .append_pair("lon", &location.x.to_string());
        Ok(url)
    }
}

fn first_place(query: &str, hits: Vec<SearchHit>) -> Result<Place, GeocodeError> {
    let hit = hits
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NotFound {
            query: query.to_owned(),
        })?;
    let location = parse_coord(&hit.lat, &hit.lon).ok_or_else(|| {
        GeocodeError::Transport(TransportError::Parse {
            message: format!("invalid coordinates {:?}, {:?}", hit.lat, hit.lon),
        })
    })?;
    Ok(Place {
        location,
        display_name: hit.display_name,
    })
}

fn reverse_address(response: ReverseResponse) -> Result<String, GeocodeError> {
    if let Some(message) = response.error {
        return Err(GeocodeError::Unavailable { message });
    }
    response.display_name.ok_or_else(|| GeocodeError::Unavailable {
        message: "response carried no display name".to_owned(),
    })
}

#[async_trait(?Send)]
impl GeocodeGateway for NominatimGateway {
    async fn geocode(&self, address: &str) -> Result<Place, GeocodeError> {
        let url = self.build_search_url(address)?;
        debug!("geocoding {address:?}");
        let hits: Vec<SearchHit> = get_json(&self.client, &url, self.config.timeout).await?;
        first_place(address, hits)
    }
}

#[async_trait(?Send)]
impl ReverseGeocodeGateway for NominatimGateway {
    async fn reverse_geocode(&self, location: Coord<f64>) -> Result<String, GeocodeError> {
        let url = self.build_reverse_url(location)?;
        debug!("reverse geocoding ({}, {})", location.y, location.x);
        let response: ReverseResponse =
            get_json(&self.client, &url, self.config.timeout).await?;
        reverse_address(response)
    }
}
