//! Score candidate routes for safety.
//!
//! The `RouteScorer` trait assigns a [`SafetyRating`] to a [`Route`]. The
//! bundled [`SyntheticScorer`] derives a plausible score from the route's
//! distance and point count alone; it exists so the ranking and selection
//! contract can be exercised before a real safety data source is plugged in.

use crate::{Route, SafetyRating};

/// Calculate a safety rating for a route.
///
/// Higher scores indicate a safer route. Implementations must be
/// thread-safe (`Send` + `Sync`) and total: scoring never fails and never
/// performs I/O. Identical routes must receive identical ratings.
///
/// Use [`SafetyRating::from_raw`] to clamp an unbounded value into the valid
/// range.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use safepath_core::{Route, RouteScorer, SafetyRating};
///
/// struct FlatScorer;
///
/// impl RouteScorer for FlatScorer {
///     fn score(&self, _route: &Route) -> SafetyRating {
///         SafetyRating::from_score(90)
///     }
/// }
///
/// let route = Route::from_coords(
///     vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 0.01 }],
///     1_100.0,
///     90.0,
/// )?;
/// assert_eq!(FlatScorer.score(&route).score(), 90);
/// # Ok::<(), safepath_core::RouteError>(())
/// ```
pub trait RouteScorer: Send + Sync {
    /// Return the safety rating for `route`.
    fn score(&self, route: &Route) -> SafetyRating;
}

/// Deterministic placeholder scorer driven by distance and complexity.
///
/// `seed = distance * 0.01 + points * 0.1` and
/// `raw = 50 + 30 sin(seed) + 20 cos(2 seed)`, clamped to `30..=100` and
/// rounded.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use safepath_core::{Route, RouteScorer, SafetyLevel, SyntheticScorer};
///
/// let coords = (0..20).map(|i| Coord { x: f64::from(i) * 0.001, y: 51.5 }).collect();
/// let route = Route::from_coords(coords, 2_000.0, 600.0)?;
/// let rating = SyntheticScorer.score(&route);
///
/// assert_eq!(rating.score(), 70);
/// assert_eq!(rating.level(), SafetyLevel::Moderate);
/// # Ok::<(), safepath_core::RouteError>(())
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticScorer;

impl SyntheticScorer {
    const DISTANCE_FACTOR: f64 = 0.01;
    const COMPLEXITY_FACTOR: f64 = 0.1;

    /// Seed derived from a distance in metres and a point count.
    pub fn seed(distance_meters: f64, complexity: usize) -> f64 {
        distance_meters * Self::DISTANCE_FACTOR + complexity as f64 * Self::COMPLEXITY_FACTOR
    }

    /// Unclamped score for a seed.
    pub fn raw_score(seed: f64) -> f64 {
        50.0 + 30.0 * seed.sin() + 20.0 * (2.0 * seed).cos()
    }
}

impl RouteScorer for SyntheticScorer {
    fn score(&self, route: &Route) -> SafetyRating {
        let seed = Self::seed(route.total_distance_meters(), route.point_count());
        SafetyRating::from_raw(Self::raw_score(seed))
    }
}
