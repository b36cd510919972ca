//! Authoritative "selected route" state and its rendering side effects.
//!
//! [`SelectionController`] is a two-state machine:
//!
//! - **Empty**: nothing loaded, nothing selected.
//! - **Ready**: a ranked list is loaded and exactly one index is selected.
//!
//! Every successful selection issues a restyle against the
//! [`MapRenderer`]. Rendering problems are recorded as [`Diagnostic`]s and
//! never roll back or corrupt the selected index.

use log::{debug, warn};

use crate::render::{Diagnostic, MapRenderer, RenderFailure, RouteStyle, SelectionRangeError};
use crate::{RankedRouteList, ScoredRoute};

/// Current state of a [`SelectionController`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    /// No routes are loaded.
    #[default]
    Empty,
    /// Routes are loaded and `selected` indexes into them.
    Ready {
        /// Ranked routes, safest first.
        routes: RankedRouteList,
        /// Index of the selected route, always in range.
        selected: usize,
    },
}

/// Owns the ranked routes of one search session and the selected index.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use safepath_core::test_support::RecordingRenderer;
/// use safepath_core::{score_routes, Route, SelectionController, SyntheticScorer};
///
/// let routes = (1..=3)
///     .map(|i| {
///         Route::from_coords(
///             vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 0.01 }],
///             1_000.0 * f64::from(i),
///             60.0,
///         )
///     })
///     .collect::<Result<Vec<_>, _>>()?;
///
/// let mut controller = SelectionController::new(RecordingRenderer::default());
/// controller.load_routes(score_routes(&SyntheticScorer, routes));
/// assert_eq!(controller.selected_index(), Some(0));
///
/// assert!(controller.select_route(2));
/// assert_eq!(controller.selected_index(), Some(2));
///
/// assert!(!controller.select_route(5));
/// assert_eq!(controller.selected_index(), Some(2));
/// # Ok::<(), safepath_core::RouteError>(())
/// ```
#[derive(Debug)]
pub struct SelectionController<R> {
    renderer: R,
    state: SelectionState,
    diagnostics: Vec<Diagnostic>,
}

impl<R: MapRenderer> SelectionController<R> {
    /// Create an empty controller driving `renderer`.
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            state: SelectionState::Empty,
            diagnostics: Vec::new(),
        }
    }

    /// Replace all loaded routes with `routes`.
    ///
    /// A non-empty list selects index 0, the safest route, and restyles the
    /// map. An empty list leaves the controller empty. Diagnostics recorded
    /// against the previous routes are discarded.
    pub fn load_routes(&mut self, routes: RankedRouteList) {
        self.diagnostics.clear();
        if routes.is_empty() {
            debug!("loaded empty route list; selection cleared");
            self.state = SelectionState::Empty;
            return;
        }
        debug!("loaded {} ranked routes; selecting safest", routes.len());
        self.state = SelectionState::Ready {
            routes,
            selected: 0,
        };
        self.restyle();
    }

    /// Select the route at `index` and restyle the map.
    ///
    /// Returns `false` and records a [`SelectionRangeError`] when `index` is
    /// out of range or nothing is loaded; the state is left untouched.
    pub fn select_route(&mut self, index: usize) -> bool {
        match &mut self.state {
            SelectionState::Ready { routes, selected } if index < routes.len() => {
                *selected = index;
            }
            SelectionState::Ready { routes, .. } => {
                let available = routes.len();
                Self::record(
                    &mut self.diagnostics,
                    SelectionRangeError {
                        requested: index,
                        available,
                    }
                    .into(),
                );
                return false;
            }
            SelectionState::Empty => {
                Self::record(
                    &mut self.diagnostics,
                    SelectionRangeError {
                        requested: index,
                        available: 0,
                    }
                    .into(),
                );
                return false;
            }
        }
        self.restyle();
        true
    }

    /// Re-issue the restyle command for the current selection.
    ///
    /// Does nothing when empty.
    pub fn refresh(&mut self) {
        self.restyle();
    }

    /// Drop all routes and their diagnostics, returning to the empty state.
    pub fn clear(&mut self) {
        self.state = SelectionState::Empty;
        self.diagnostics.clear();
    }

    /// Current state.
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Whether no routes are loaded.
    pub const fn is_empty(&self) -> bool {
        matches!(self.state, SelectionState::Empty)
    }

    /// Selected index, if routes are loaded.
    pub const fn selected_index(&self) -> Option<usize> {
        match self.state {
            SelectionState::Ready { selected, .. } => Some(selected),
            SelectionState::Empty => None,
        }
    }

    /// Selected route, if routes are loaded.
    pub fn selected(&self) -> Option<&ScoredRoute> {
        match &self.state {
            SelectionState::Ready { routes, selected } => routes.get(*selected),
            SelectionState::Empty => None,
        }
    }

    /// Loaded routes, or `None` when empty.
    pub const fn routes(&self) -> Option<&RankedRouteList> {
        match &self.state {
            SelectionState::Ready { routes, .. } => Some(routes),
            SelectionState::Empty => None,
        }
    }

    /// Diagnostics recorded for the loaded routes since the last
    /// [`take_diagnostics`](Self::take_diagnostics).
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain recorded diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Borrow the renderer.
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutably borrow the renderer.
    pub const fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Consume the controller, returning the renderer.
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn restyle(&mut self) {
        let SelectionState::Ready { routes, selected } = &self.state else {
            return;
        };
        if let Err(source) = self.renderer.hide_alternative_overlays() {
            Self::record(
                &mut self.diagnostics,
                RenderFailure::Overlays { source }.into(),
            );
        }
        for (index, entry) in routes.iter().enumerate() {
            let style = if index == *selected {
                RouteStyle::selected(entry.safety.color())
            } else {
                RouteStyle::muted()
            };
            let Some(layer) = entry.route.layer() else {
                Self::record(
                    &mut self.diagnostics,
                    RenderFailure::MissingLayer { index }.into(),
                );
                continue;
            };
            if let Err(source) = self.renderer.set_route_style(layer, &style) {
                Self::record(
                    &mut self.diagnostics,
                    RenderFailure::Style { index, source }.into(),
                );
            }
        }
    }

    fn record(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        RecordingRenderer, RenderCommand, ranked_with_scores, ranked_without_layers,
    };
    use crate::{LayerHandle, RenderError};
    use rstest::{fixture, rstest};

    #[fixture]
    fn loaded() -> SelectionController<RecordingRenderer> {
        let mut controller = SelectionController::new(RecordingRenderer::default());
        controller.load_routes(ranked_with_scores(&[95, 70, 40]));
        controller.renderer_mut().clear();
        controller
    }

    #[rstest]
    fn starts_empty() {
        let controller = SelectionController::new(RecordingRenderer::default());
        assert!(controller.is_empty());
        assert_eq!(controller.selected_index(), None);
        assert!(controller.selected().is_none());
    }

    #[rstest]
    fn loading_selects_first_and_restyles() {
        let mut controller = SelectionController::new(RecordingRenderer::default());
        controller.load_routes(ranked_with_scores(&[90, 50]));

        assert_eq!(controller.selected_index(), Some(0));
        assert_eq!(controller.renderer().style_count(), 2);
        assert_eq!(
            controller.renderer().style_for(LayerHandle(0)),
            Some(RouteStyle::selected("#4CAF50"))
        );
    }

    #[rstest]
    fn loading_empty_list_stays_empty() {
        let mut controller = SelectionController::new(RecordingRenderer::default());
        controller.load_routes(RankedRouteList::empty());
        assert!(controller.is_empty());
        assert!(!controller.select_route(0));
        assert!(controller.renderer().commands().is_empty());
    }

    #[rstest]
    fn selecting_restyles_every_route(mut loaded: SelectionController<RecordingRenderer>) {
        assert!(loaded.select_route(2));

        let renderer = loaded.renderer();
        assert_eq!(renderer.commands().first(), Some(&RenderCommand::HideAlternatives));
        assert_eq!(
            renderer.style_for(LayerHandle(2)),
            Some(RouteStyle::selected("#F44336"))
        );
        assert_eq!(renderer.style_for(LayerHandle(0)), Some(RouteStyle::muted()));
        assert_eq!(renderer.style_for(LayerHandle(1)), Some(RouteStyle::muted()));
    }

    #[rstest]
    fn out_of_range_is_a_no_op(mut loaded: SelectionController<RecordingRenderer>) {
        assert!(loaded.select_route(1));
        loaded.renderer_mut().clear();

        assert!(!loaded.select_route(5));

        assert_eq!(loaded.selected_index(), Some(1));
        assert!(loaded.renderer().commands().is_empty());
        assert_eq!(
            loaded.diagnostics(),
            &[Diagnostic::SelectionRange(SelectionRangeError {
                requested: 5,
                available: 3,
            })]
        );
    }

    #[rstest]
    fn render_failure_does_not_roll_back(mut loaded: SelectionController<RecordingRenderer>) {
        loaded.renderer_mut().fail_layer(LayerHandle(1));

        assert!(loaded.select_route(1));

        assert_eq!(loaded.selected_index(), Some(1));
        assert_eq!(
            loaded.take_diagnostics(),
            vec![Diagnostic::Render(RenderFailure::Style {
                index: 1,
                source: RenderError::UnknownLayer(LayerHandle(1)),
            })]
        );
        assert_eq!(loaded.renderer().style_count(), 2);
        assert!(loaded.diagnostics().is_empty());
    }

    #[rstest]
    fn routes_without_layers_record_missing_layer() {
        let mut controller = SelectionController::new(RecordingRenderer::default());
        controller.load_routes(ranked_without_layers(&[90, 50]));
        controller.take_diagnostics();

        assert!(controller.select_route(1));

        assert_eq!(controller.selected_index(), Some(1));
        assert_eq!(
            controller.diagnostics(),
            &[
                Diagnostic::Render(RenderFailure::MissingLayer { index: 0 }),
                Diagnostic::Render(RenderFailure::MissingLayer { index: 1 }),
            ]
        );
        assert_eq!(controller.renderer().style_count(), 0);
    }

    #[rstest]
    fn overlay_failure_still_styles_every_route(
        mut loaded: SelectionController<RecordingRenderer>,
    ) {
        loaded.renderer_mut().fail_overlays();

        assert!(loaded.select_route(2));

        assert_eq!(loaded.selected_index(), Some(2));
        assert_eq!(
            loaded.diagnostics(),
            &[Diagnostic::Render(RenderFailure::Overlays {
                source: RenderError::Rejected {
                    message: "overlays unavailable".to_owned(),
                },
            })]
        );
        let renderer = loaded.renderer();
        assert_eq!(renderer.style_count(), 3);
        assert_eq!(
            renderer.style_for(LayerHandle(2)),
            Some(RouteStyle::selected("#F44336"))
        );
        assert_eq!(renderer.style_for(LayerHandle(0)), Some(RouteStyle::muted()));
    }

    #[rstest]
    fn loading_discards_previous_diagnostics(mut loaded: SelectionController<RecordingRenderer>) {
        assert!(!loaded.select_route(7));
        assert_eq!(loaded.diagnostics().len(), 1);

        loaded.load_routes(ranked_with_scores(&[80, 60]));

        assert!(loaded.diagnostics().is_empty());
    }

    #[rstest]
    fn refresh_is_idempotent(mut loaded: SelectionController<RecordingRenderer>) {
        assert!(loaded.select_route(1));
        let first = loaded.renderer().commands().to_vec();
        loaded.renderer_mut().clear();

        loaded.refresh();

        assert_eq!(loaded.renderer().commands(), first.as_slice());
    }

    #[rstest]
    fn clear_returns_to_empty(mut loaded: SelectionController<RecordingRenderer>) {
        assert!(!loaded.select_route(9));
        loaded.clear();
        assert!(loaded.is_empty());
        assert!(loaded.routes().is_none());
        assert!(loaded.diagnostics().is_empty());
    }
}
