//! Nominatim API response types.
//!
//! Nominatim encodes coordinates as decimal strings.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

use geo::Coord;
use serde::Deserialize;

/// One entry of a `/search` response.
#[derive(Debug, Deserialize)]
pub struct SearchHit {
    /// Latitude as a decimal string.
    pub lat: String,
    /// Longitude as a decimal string.
    pub lon: String,
    /// Full display address.
    pub display_name: String,
}

/// `/reverse` response.
///
/// Nominatim answers `200 OK` with an `error` field when it cannot resolve
/// the coordinates.
#[derive(Debug, Deserialize)]
pub struct ReverseResponse {
    /// Full display address, absent on error.
    pub display_name: Option<String>,
    /// Error text, present only on failure.
    pub error: Option<String>,
}

/// Parse a Nominatim coordinate pair into a `geo` coordinate.
///
/// Returns `None` when either value is not a finite number.
pub fn parse_coord(lat: &str, lon: &str) -> Option<Coord<f64>> {
    let y: f64 = lat.trim().parse().ok()?;
    let x: f64 = lon.trim().parse().ok()?;
    (x.is_finite() && y.is_finite()).then_some(Coord { x, y })
}
