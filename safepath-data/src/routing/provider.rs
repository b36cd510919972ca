//! OSRM-backed `RoutingGateway`.

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use log::{debug, warn};
use reqwest::Client;
use safepath_core::{Route, RoutingError, RoutingGateway, TransportError};

use super::osrm::RouteResponse;
use crate::http::{build_client, convert_reqwest_error, parse_base_url};
use crate::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, GatewayBuildError};

/// Public OSRM demo server.
pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";

/// Routing profile used when none is configured.
pub const DEFAULT_PROFILE: &str = "driving";

/// Configuration for [`OsrmRoutingGateway`].
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// OSRM profile, e.g. `"driving"` or `"foot"`.
    pub profile: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OSRM_URL.to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OsrmConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the routing profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
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

/// Routing gateway using the OSRM Route API.
#[derive(Debug)]
pub struct OsrmRoutingGateway {
    client: Client,
    base: url::Url,
    config: OsrmConfig,
}

impl OsrmRoutingGateway {
    /// Create a gateway with default settings for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayBuildError> {
        Self::with_config(OsrmConfig::new(base_url))
    }

    /// Create a gateway with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn with_config(config: OsrmConfig) -> Result<Self, GatewayBuildError> {
        let base = parse_base_url(&config.base_url)?;
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            client,
            base,
            config,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    /// Build the Route API URL for a pair of coordinates.
    ///
    /// The URL format is:
    /// `{base_url}/route/v1/{profile}/{lon},{lat};{lon},{lat}?alternatives=true&overview=full&geometries=geojson`.
    fn build_route_url(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<url::Url, TransportError> {
        let path = format!(
            "route/v1/{}/{},{};{},{}",
            self.config.profile, origin.x, origin.y, destination.x, destination.y
        );
        let mut url = self
            .base
            .join(&path)
            .map_err(|err| TransportError::Network {
                url: format!("{}{path}", self.base),
                message: err.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("alternatives", "true")
            .append_pair("overview", "full")
            .append_pair("geometries", "geojson");
        Ok(url)
    }

    /// Fetch and decode the Route API response.
    ///
    /// OSRM reports routing failures such as `NoRoute` with a 4xx status and a
    /// JSON body, so the body is decoded before the status is considered.
    async fn fetch(&self, url: &url::Url) -> Result<RouteResponse, TransportError> {
        let timeout = self.config.timeout;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, url.as_str(), timeout))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| convert_reqwest_error(&err, url.as_str(), timeout))?;

        match serde_json::from_str::<RouteResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(TransportError::Http {
                url: url.as_str().to_owned(),
                status: status.as_u16(),
                message: body,
            }),
            Err(err) => Err(TransportError::Parse {
                message: err.to_string(),
            }),
        }
    }
}

/// Convert an OSRM response into validated routes, preserving order.
///
/// Routes whose geometry or metrics fail validation are skipped.
fn convert_response(response: RouteResponse) -> Result<Vec<Route>, RoutingError> {
    if !response.is_ok() {
        return Err(RoutingError::Service {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }

    let routes = response
        .routes
        .into_iter()
        .enumerate()
        .filter_map(|(index, route)| {
            Route::from_coords(route.geometry.to_coords(), route.distance, route.duration)
                .map_err(|err| warn!("skipping OSRM route {index}: {err}"))
                .ok()
        })
        .collect();
    Ok(routes)
}

#[async_trait(?Send)]
impl RoutingGateway for OsrmRoutingGateway {
    async fn find_routes(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Vec<Route>, RoutingError> {
        let url = self.build_route_url(origin, destination)?;
        debug!("requesting routes from {url}");
        let response = self.fetch(&url).await?;
        let routes = convert_response(response)?;
        debug!("OSRM returned {} usable routes", routes.len());
        Ok(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn gateway() -> OsrmRoutingGateway {
        OsrmRoutingGateway::new("http://osrm.example.com").expect("gateway should build")
    }

    fn parse(json: &str) -> RouteResponse {
        serde_json::from_str(json).expect("valid OSRM json")
    }

    #[rstest]
    fn build_route_url_formats_coordinates(gateway: OsrmRoutingGateway) {
        let url = gateway
            .build_route_url(Coord { x: -0.09, y: 51.505 }, Coord { x: -0.08, y: 51.51 })
            .expect("url");

        assert_eq!(
            url.as_str(),
            "http://osrm.example.com/route/v1/driving/-0.09,51.505;-0.08,51.51\
             ?alternatives=true&overview=full&geometries=geojson"
        );
    }

    #[rstest]
    fn build_route_url_keeps_base_path() {
        let gateway = OsrmRoutingGateway::with_config(
            OsrmConfig::new("http://example.com/osrm/").with_profile("foot"),
        )
        .expect("gateway should build");

        let url = gateway
            .build_route_url(Coord { x: 1.0, y: 2.0 }, Coord { x: 3.0, y: 4.0 })
            .expect("url");

        assert!(url.as_str().starts_with("http://example.com/osrm/route/v1/foot/1,2;3,4?"));
    }

    #[rstest]
    fn convert_response_preserves_order() {
        let response = parse(
            r#"{"code":"Ok","routes":[
                {"distance":1000.0,"duration":100.0,"geometry":{"coordinates":[[0,0],[0,1]]}},
                {"distance":2000.0,"duration":200.0,"geometry":{"coordinates":[[0,0],[1,1],[0,1]]}}
            ]}"#,
        );

        let routes = convert_response(response).expect("routes");

        assert_eq!(routes.len(), 2);
        assert!((routes[0].total_distance_meters() - 1000.0).abs() < f64::EPSILON);
        assert_eq!(routes[1].point_count(), 3);
    }

    #[rstest]
    fn convert_response_skips_degenerate_routes() {
        let response = parse(
            r#"{"code":"Ok","routes":[
                {"distance":10.0,"duration":1.0,"geometry":{"coordinates":[[0,0]]}},
                {"distance":-5.0,"duration":1.0,"geometry":{"coordinates":[[0,0],[0,1]]}},
                {"distance":20.0,"duration":2.0,"geometry":{"coordinates":[[0,0],[0,1]]}}
            ]}"#,
        );

        let routes = convert_response(response).expect("routes");

        assert_eq!(routes.len(), 1);
        assert!((routes[0].total_distance_meters() - 20.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn convert_response_handles_service_error() {
        let response = parse(r#"{"code":"NoRoute","message":"Impossible route"}"#);

        let err = convert_response(response).expect_err("should fail");

        assert_eq!(
            err,
            RoutingError::Service {
                code: "NoRoute".into(),
                message: "Impossible route".into(),
            }
        );
    }

    #[rstest]
    fn convert_response_allows_empty_route_list() {
        let response = parse(r#"{"code":"Ok","routes":[]}"#);
        assert_eq!(convert_response(response), Ok(Vec::new()));
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = OsrmConfig::new("http://example.com")
            .with_profile("foot")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.profile, "foot");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    #[rstest]
    fn default_config_targets_public_server() {
        let config = OsrmConfig::default();
        assert_eq!(config.base_url, DEFAULT_OSRM_URL);
        assert_eq!(config.profile, DEFAULT_PROFILE);
    }
}
