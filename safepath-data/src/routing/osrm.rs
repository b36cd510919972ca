//! OSRM API response types for the Route service.
//!
//! Only the fields the gateway consumes are modelled. Geometry is requested
//! as GeoJSON so coordinates arrive as `[lon, lat]` pairs.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use geo::Coord;
use serde::Deserialize;

/// OSRM Route API response.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route between the coordinates
    /// - `"InvalidQuery"` - Invalid query parameters
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Primary route followed by alternatives.
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

/// One route in a [`RouteResponse`].
#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    /// Length in metres.
    pub distance: f64,
    /// Travel time in seconds.
    pub duration: f64,
    /// Full-resolution route geometry.
    pub geometry: GeoJsonLineString,
}

/// GeoJSON `LineString` geometry.
#[derive(Debug, Deserialize)]
pub struct GeoJsonLineString {
    /// `[longitude, latitude]` pairs.
    pub coordinates: Vec<[f64; 2]>,
}

impl GeoJsonLineString {
    /// Convert to `geo` coordinates with `x = longitude`, `y = latitude`.
    pub fn to_coords(&self) -> Vec<Coord<f64>> {
        self.coordinates
            .iter()
            .map(|&[lon, lat]| Coord { x: lon, y: lat })
            .collect()
    }
}
