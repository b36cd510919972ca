//! Candidate routes between an origin and a destination.
//!
//! A [`Route`] is what a routing gateway hands back: an immutable polyline
//! plus summary metrics. Safety data is attached later by pairing the route
//! with a [`SafetyRating`](crate::SafetyRating) in a
//! [`ScoredRoute`](crate::ScoredRoute).

use std::time::Duration;

use geo::{Coord, LineString};
use thiserror::Error;

/// Minimum number of points a route geometry must contain.
pub const MIN_ROUTE_POINTS: usize = 2;

/// Opaque handle identifying a drawn route inside a map renderer.
///
/// Handles are assigned by whichever component drew the polyline. Headless
/// gateways leave routes without a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerHandle(pub u64);

/// One candidate path between two points.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. The
/// geometry cannot be changed once the route exists.
///
/// # Examples
/// ```
/// use geo::{Coord, LineString};
/// use safepath_core::Route;
///
/// let geometry = LineString::from(vec![
///     Coord { x: -0.09, y: 51.505 },
///     Coord { x: -0.08, y: 51.51 },
/// ]);
/// let route = Route::new(geometry, 1_200.0, 300.0)?;
///
/// assert_eq!(route.point_count(), 2);
/// assert_eq!(route.distance_label(), "1.2 km");
/// # Ok::<(), safepath_core::RouteError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Route {
    geometry: LineString<f64>,
    total_distance_meters: f64,
    total_time_seconds: f64,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    layer: Option<LayerHandle>,
}

/// Errors returned by [`Route::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// The geometry had fewer than [`MIN_ROUTE_POINTS`] points.
    #[error("route geometry needs at least {MIN_ROUTE_POINTS} points, got {points}")]
    TooFewPoints {
        /// Number of points supplied.
        points: usize,
    },
    /// The distance was negative, NaN or infinite.
    #[error("route distance must be a non-negative finite number of metres, got {meters}")]
    InvalidDistance {
        /// Offending distance.
        meters: f64,
    },
    /// The travel time was negative, NaN or infinite.
    #[error("route duration must be a non-negative finite number of seconds, got {seconds}")]
    InvalidDuration {
        /// Offending duration.
        seconds: f64,
    },
}

impl Route {
    /// Validate and construct a route without a layer handle.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] when the geometry is too short or either metric
    /// is negative or non-finite.
    pub fn new(
        geometry: LineString<f64>,
        total_distance_meters: f64,
        total_time_seconds: f64,
    ) -> Result<Self, RouteError> {
        let points = geometry.0.len();
        if points < MIN_ROUTE_POINTS {
            return Err(RouteError::TooFewPoints { points });
        }
        if !is_non_negative(total_distance_meters) {
            return Err(RouteError::InvalidDistance {
                meters: total_distance_meters,
            });
        }
        if !is_non_negative(total_time_seconds) {
            return Err(RouteError::InvalidDuration {
                seconds: total_time_seconds,
            });
        }
        Ok(Self {
            geometry,
            total_distance_meters,
            total_time_seconds,
            layer: None,
        })
    }

    /// Construct a route from a plain list of coordinates.
    ///
    /// # Errors
    ///
    /// Same as [`Route::new`].
    pub fn from_coords(
        coords: Vec<Coord<f64>>,
        total_distance_meters: f64,
        total_time_seconds: f64,
    ) -> Result<Self, RouteError> {
        Self::new(
            LineString::from(coords),
            total_distance_meters,
            total_time_seconds,
        )
    }

    /// Attach the renderer handle of the drawn polyline.
    #[must_use]
    pub fn with_layer(mut self, layer: LayerHandle) -> Self {
        self.layer = Some(layer);
        self
    }

    /// Ordered route geometry.
    pub fn geometry(&self) -> &LineString<f64> {
        &self.geometry
    }

    /// Number of points in the geometry.
    pub fn point_count(&self) -> usize {
        self.geometry.0.len()
    }

    /// Total length in metres.
    pub fn total_distance_meters(&self) -> f64 {
        self.total_distance_meters
    }

    /// Total travel time in seconds.
    pub fn total_time_seconds(&self) -> f64 {
        self.total_time_seconds
    }

    /// Total travel time as a [`Duration`], saturating on overflow.
    pub fn total_time(&self) -> Duration {
        Duration::try_from_secs_f64(self.total_time_seconds).unwrap_or(Duration::MAX)
    }

    /// Renderer handle, if the route has been drawn.
    pub fn layer(&self) -> Option<LayerHandle> {
        self.layer
    }

    /// Distance formatted in kilometres with one decimal, e.g. `"2.4 km"`.
    pub fn distance_label(&self) -> String {
        format!("{:.1} km", self.total_distance_meters / 1000.0)
    }

    /// Travel time formatted as `"1 hr 5 min"`, or `"42 min"` under an hour.
    pub fn duration_label(&self) -> String {
        let total_minutes = self.total_time().as_secs() / 60;
        let hours = total_minutes / 60;
        let minutes = total_minutes % 60;
        if hours > 0 {
            format!("{hours} hr {minutes} min")
        } else {
            format!("{minutes} min")
        }
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn line(points: usize) -> Vec<Coord<f64>> {
        (0..points)
            .map(|i| Coord {
                x: i as f64 * 0.001,
                y: 51.5,
            })
            .collect()
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn rejects_short_geometry(#[case] points: usize) {
        let err = Route::from_coords(line(points), 10.0, 10.0).expect_err("too short");
        assert_eq!(err, RouteError::TooFewPoints { points });
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_distance(#[case] meters: f64) {
        let err = Route::from_coords(line(2), meters, 10.0).expect_err("bad distance");
        assert!(matches!(err, RouteError::InvalidDistance { .. }));
    }

    #[rstest]
    #[case(-0.5)]
    #[case(f64::NAN)]
    fn rejects_invalid_duration(#[case] seconds: f64) {
        let err = Route::from_coords(line(2), 10.0, seconds).expect_err("bad duration");
        assert!(matches!(err, RouteError::InvalidDuration { .. }));
    }

    #[rstest]
    fn accepts_zero_metrics() {
        let route = Route::from_coords(line(2), 0.0, 0.0).expect("zero is valid");
        assert_eq!(route.total_time(), Duration::ZERO);
        assert!(route.layer().is_none());
    }

    #[rstest]
    fn layer_is_attached() {
        let route = Route::from_coords(line(3), 10.0, 10.0)
            .expect("valid route")
            .with_layer(LayerHandle(7));
        assert_eq!(route.layer(), Some(LayerHandle(7)));
        assert_eq!(route.point_count(), 3);
    }

    #[rstest]
    #[case(2_000.0, "2.0 km")]
    #[case(1_234.0, "1.2 km")]
    #[case(0.0, "0.0 km")]
    fn formats_distance(#[case] meters: f64, #[case] expected: &str) {
        let route = Route::from_coords(line(2), meters, 0.0).expect("valid route");
        assert_eq!(route.distance_label(), expected);
    }

    #[rstest]
    #[case(59.0, "0 min")]
    #[case(600.0, "10 min")]
    #[case(3_600.0, "1 hr 0 min")]
    #[case(5_430.0, "1 hr 30 min")]
    fn formats_duration(#[case] seconds: f64, #[case] expected: &str) {
        let route = Route::from_coords(line(2), 0.0, seconds).expect("valid route");
        assert_eq!(route.duration_label(), expected);
    }
}
