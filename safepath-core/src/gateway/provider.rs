//! Gateway traits for geocoding and route finding.

use async_trait::async_trait;
use geo::Coord;

use super::error::{GeocodeError, RoutingError};
use crate::Route;

/// A geocoded location.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Place {
    /// Position with `x = longitude`, `y = latitude`.
    pub location: Coord<f64>,
    /// Human-readable name reported by the service.
    pub display_name: String,
}

/// Resolve free-form address text to coordinates.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use geo::Coord;
/// use safepath_core::{GeocodeError, GeocodeGateway, Place};
///
/// struct Fixed;
///
/// #[async_trait(?Send)]
/// impl GeocodeGateway for Fixed {
///     async fn geocode(&self, address: &str) -> Result<Place, GeocodeError> {
///         if address == "Tower Bridge" {
///             Ok(Place {
///                 location: Coord { x: -0.0754, y: 51.5055 },
///                 display_name: "Tower Bridge, London".into(),
///             })
///         } else {
///             Err(GeocodeError::NotFound { query: address.into() })
///         }
///     }
/// }
/// ```
#[async_trait(?Send)]
pub trait GeocodeGateway {
    /// Return the best match for `address`.
    ///
    /// Implementations must return [`GeocodeError::NotFound`] when the
    /// service has no match, keeping it distinct from transport failures.
    async fn geocode(&self, address: &str) -> Result<Place, GeocodeError>;
}

/// Resolve coordinates to a display address.
#[async_trait(?Send)]
pub trait ReverseGeocodeGateway {
    /// Return a display name for `location`.
    async fn reverse_geocode(&self, location: Coord<f64>) -> Result<String, GeocodeError>;
}

/// Find candidate routes between two points.
///
/// The primary route comes first and alternatives follow; the order is
/// used to break ties when ranking.
#[async_trait(?Send)]
pub trait RoutingGateway {
    /// Return every candidate route from `origin` to `destination`.
    ///
    /// An empty vector is a valid answer; callers decide how to report it.
    async fn find_routes(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Vec<Route>, RoutingError>;
}
