//! Order scored routes from safest to least safe.

use std::cmp::Reverse;

use crate::{Route, RouteScorer, SafetyRating};

/// A route paired with its safety rating.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScoredRoute {
    /// The candidate route.
    pub route: Route,
    /// Rating computed for `route`.
    pub safety: SafetyRating,
}

impl ScoredRoute {
    /// Score `route` with `scorer`.
    pub fn new(route: Route, scorer: &dyn RouteScorer) -> Self {
        let safety = scorer.score(&route);
        Self { route, safety }
    }

    /// Safety score shortcut.
    pub const fn score(&self) -> u8 {
        self.safety.score()
    }
}

/// Routes ordered by descending safety score.
///
/// The only way to build a non-empty list is [`rank`], so the ordering
/// invariant always holds.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct RankedRouteList {
    entries: Vec<ScoredRoute>,
}

impl RankedRouteList {
    /// An empty list.
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list holds no routes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Route at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&ScoredRoute> {
        self.entries.get(index)
    }

    /// Safest route.
    pub fn first(&self) -> Option<&ScoredRoute> {
        self.entries.first()
    }

    /// Iterate from safest to least safe.
    pub fn iter(&self) -> std::slice::Iter<'_, ScoredRoute> {
        self.entries.iter()
    }

    /// Borrow the ordered entries.
    pub fn as_slice(&self) -> &[ScoredRoute] {
        &self.entries
    }

    /// Consume the list, returning the ordered entries.
    pub fn into_vec(self) -> Vec<ScoredRoute> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a RankedRouteList {
    type Item = &'a ScoredRoute;
    type IntoIter = std::slice::Iter<'a, ScoredRoute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Sort scored routes by descending score.
///
/// The sort is stable: routes with equal scores keep the order the routing
/// gateway returned them in, so the primary route wins ties.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use safepath_core::{rank, Route, SafetyRating, ScoredRoute};
///
/// let route = Route::from_coords(
///     vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 0.01 }],
///     1_000.0,
///     60.0,
/// )?;
/// let scored = vec![
///     ScoredRoute { route: route.clone(), safety: SafetyRating::from_score(70) },
///     ScoredRoute { route, safety: SafetyRating::from_score(95) },
/// ];
/// let ranked = rank(scored);
/// assert_eq!(ranked.first().map(ScoredRoute::score), Some(95));
/// # Ok::<(), safepath_core::RouteError>(())
/// ```
pub fn rank(mut scored: Vec<ScoredRoute>) -> RankedRouteList {
    scored.sort_by_key(|entry| Reverse(entry.score()));
    RankedRouteList { entries: scored }
}

/// Score every route with `scorer`, then [`rank`] the result.
pub fn score_routes(scorer: &dyn RouteScorer, routes: Vec<Route>) -> RankedRouteList {
    let scored = routes
        .into_iter()
        .map(|route| ScoredRoute::new(route, scorer))
        .collect();
    rank(scored)
}
