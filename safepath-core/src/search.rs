//! One user's route search pipeline.
//!
//! A search runs geocode → route-find → score → rank → load. The network
//! half ([`fetch_routes`]) does not borrow the session, so a caller can
//! start a newer search while an older one is still in flight. Every search
//! carries a [`Generation`]; [`SearchSession::apply`] accepts only the
//! outcome of the most recent one and silently drops the rest.

use std::fmt;

use geo::Coord;
use log::debug;
use thiserror::Error;

use crate::gateway::{GeocodeError, GeocodeGateway, RoutingError, RoutingGateway};
use crate::render::MapRenderer;
use crate::{Route, RouteScorer, SelectionController, SyntheticScorer, score_routes};

/// Monotonically increasing search counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Generation(pub u64);

impl Generation {
    const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Broad class of a [`SearchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorKind {
    /// Required input was missing; no gateway was called.
    Input,
    /// The destination could not be geocoded.
    NotFound,
    /// A gateway failed; retrying may help.
    Gateway,
    /// The routing service returned no routes.
    EmptyResult,
}

/// Errors that end a search attempt. All of them reach the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The user's location has not been shared yet.
    #[error("share your location before searching for routes")]
    MissingOrigin,
    /// The destination text was empty.
    #[error("enter a destination")]
    MissingDestination,
    /// The geocoder found no match for the destination.
    #[error("destination {query:?} not found; try adding more details to your search")]
    DestinationNotFound {
        /// Destination text that was searched.
        query: String,
    },
    /// Geocoding failed for a reason other than "no match".
    #[error("could not look up the destination, please try again: {0}")]
    Geocoding(#[source] GeocodeError),
    /// Route calculation failed.
    #[error("could not calculate routes, please try again: {0}")]
    Routing(#[source] RoutingError),
    /// The routing service returned zero routes.
    #[error("no routes found; try a different destination")]
    NoRoutes,
}

impl SearchError {
    /// Classify the error.
    pub const fn kind(&self) -> SearchErrorKind {
        match self {
            Self::MissingOrigin | Self::MissingDestination => SearchErrorKind::Input,
            Self::DestinationNotFound { .. } => SearchErrorKind::NotFound,
            Self::Geocoding(_) | Self::Routing(_) => SearchErrorKind::Gateway,
            Self::NoRoutes => SearchErrorKind::EmptyResult,
        }
    }

    /// Whether repeating the same search may succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), SearchErrorKind::Gateway)
    }
}

impl From<GeocodeError> for SearchError {
    fn from(error: GeocodeError) -> Self {
        match error {
            GeocodeError::NotFound { query } => Self::DestinationNotFound { query },
            other => Self::Geocoding(other),
        }
    }
}

impl From<RoutingError> for SearchError {
    fn from(error: RoutingError) -> Self {
        Self::Routing(error)
    }
}

/// Inputs of one search, stamped with its generation.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    generation: Generation,
    origin: Coord<f64>,
    destination: String,
}

impl SearchTicket {
    /// Generation this ticket belongs to.
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// User location the search starts from.
    pub const fn origin(&self) -> Coord<f64> {
        self.origin
    }

    /// Trimmed destination text.
    pub fn destination(&self) -> &str {
        &self.destination
    }
}

/// Result of the network half of a search, keyed by generation.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    generation: Generation,
    result: Result<Vec<Route>, SearchError>,
}

impl SearchOutcome {
    /// Wrap a result produced for `generation`.
    pub const fn new(generation: Generation, result: Result<Vec<Route>, SearchError>) -> Self {
        Self { generation, result }
    }

    /// Generation the outcome belongs to.
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Routes or the error that ended the search.
    pub const fn result(&self) -> &Result<Vec<Route>, SearchError> {
        &self.result
    }
}

/// What [`SearchSession::apply`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Routes were scored, ranked and loaded; the safest is selected.
    Loaded {
        /// Number of routes loaded.
        routes: usize,
    },
    /// The outcome belonged to a superseded search and was dropped.
    Stale {
        /// Generation of the dropped outcome.
        generation: Generation,
    },
}

/// Geocode the ticket's destination and fetch candidate routes.
///
/// The returned outcome carries the ticket's generation so the session can
/// tell whether it is still wanted.
pub async fn fetch_routes(
    ticket: SearchTicket,
    geocoder: &dyn GeocodeGateway,
    router: &dyn RoutingGateway,
) -> SearchOutcome {
    let generation = ticket.generation;
    let result = fetch_routes_inner(&ticket, geocoder, router).await;
    SearchOutcome { generation, result }
}

async fn fetch_routes_inner(
    ticket: &SearchTicket,
    geocoder: &dyn GeocodeGateway,
    router: &dyn RoutingGateway,
) -> Result<Vec<Route>, SearchError> {
    debug!(
        "search {}: geocoding {:?}",
        ticket.generation, ticket.destination
    );
    let place = geocoder.geocode(&ticket.destination).await?;
    debug!(
        "search {}: routing to {} ({}, {})",
        ticket.generation, place.display_name, place.location.y, place.location.x
    );
    let routes = router.find_routes(ticket.origin, place.location).await?;
    if routes.is_empty() {
        return Err(SearchError::NoRoutes);
    }
    Ok(routes)
}

/// Search pipeline and selection state owned by one caller.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use safepath_core::test_support::{sample_route, RecordingRenderer, StubGeocoder, StubRouter};
/// use safepath_core::{SearchSession, SearchStatus};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), safepath_core::SearchError> {
/// let geocoder = StubGeocoder::found(Coord { x: -0.08, y: 51.51 }, "Bank");
/// let router = StubRouter::with_routes(vec![sample_route(1_500.0, 8), sample_route(2_000.0, 20)]);
///
/// let mut session = SearchSession::new(RecordingRenderer::default());
/// session.set_origin(Coord { x: -0.09, y: 51.505 });
///
/// let status = session.search("Bank", &geocoder, &router).await?;
/// assert_eq!(status, SearchStatus::Loaded { routes: 2 });
/// assert_eq!(session.controller().selected_index(), Some(0));
/// # Ok(())
/// # }
/// ```
pub struct SearchSession<R> {
    controller: SelectionController<R>,
    scorer: Box<dyn RouteScorer>,
    origin: Option<Coord<f64>>,
    generation: Generation,
    pending: Option<Generation>,
}

impl<R: fmt::Debug> fmt::Debug for SearchSession<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchSession")
            .field("controller", &self.controller)
            .field("scorer", &"<dyn RouteScorer>")
            .field("origin", &self.origin)
            .field("generation", &self.generation)
            .field("pending", &self.pending)
            .finish()
    }
}

impl<R: MapRenderer> SearchSession<R> {
    /// Create a session scoring with [`SyntheticScorer`].
    pub fn new(renderer: R) -> Self {
        Self::with_scorer(renderer, Box::new(SyntheticScorer))
    }

    /// Create a session with a custom scorer.
    pub fn with_scorer(renderer: R, scorer: Box<dyn RouteScorer>) -> Self {
        Self {
            controller: SelectionController::new(renderer),
            scorer,
            origin: None,
            generation: Generation::default(),
            pending: None,
        }
    }

    /// Record the user's current location.
    pub const fn set_origin(&mut self, origin: Coord<f64>) {
        self.origin = Some(origin);
    }

    /// The user's location, if shared.
    pub const fn origin(&self) -> Option<Coord<f64>> {
        self.origin
    }

    /// Generation of the most recently started search.
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether a started search has not delivered its outcome yet.
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Validate input and start a new search.
    ///
    /// Starting a search supersedes any search still in flight and discards
    /// the previously loaded routes.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::MissingOrigin`] or
    /// [`SearchError::MissingDestination`]; in that case nothing changes.
    pub fn begin_search(&mut self, destination: &str) -> Result<SearchTicket, SearchError> {
        let origin = self.origin.ok_or(SearchError::MissingOrigin)?;
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(SearchError::MissingDestination);
        }
        if let Some(superseded) = self.pending {
            debug!("search {superseded} superseded");
        }
        self.generation = self.generation.next();
        self.pending = Some(self.generation);
        self.controller.clear();
        debug!("search {} started for {destination:?}", self.generation);
        Ok(SearchTicket {
            generation: self.generation,
            origin,
            destination: destination.to_owned(),
        })
    }

    /// Apply the outcome of a search.
    ///
    /// Outcomes from any generation other than the pending one are dropped
    /// without touching state, as are repeat deliveries for a generation that
    /// was already applied.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error of the current search.
    pub fn apply(&mut self, outcome: SearchOutcome) -> Result<SearchStatus, SearchError> {
        let SearchOutcome { generation, result } = outcome;
        if self.pending != Some(generation) {
            debug!(
                "dropping stale outcome for search {generation} (current {})",
                self.generation
            );
            return Ok(SearchStatus::Stale { generation });
        }
        self.pending = None;
        let routes = result?;
        let ranked = score_routes(self.scorer.as_ref(), routes);
        let count = ranked.len();
        self.controller.load_routes(ranked);
        debug!("search {generation} loaded {count} routes");
        Ok(SearchStatus::Loaded { routes: count })
    }

    /// Run a whole search: validate, fetch and apply.
    ///
    /// # Errors
    ///
    /// Returns any [`SearchError`] raised along the way.
    pub async fn search(
        &mut self,
        destination: &str,
        geocoder: &dyn GeocodeGateway,
        router: &dyn RoutingGateway,
    ) -> Result<SearchStatus, SearchError> {
        let ticket = self.begin_search(destination)?;
        let outcome = fetch_routes(ticket, geocoder, router).await;
        self.apply(outcome)
    }

    /// Select a loaded route; see [`SelectionController::select_route`].
    pub fn select_route(&mut self, index: usize) -> bool {
        self.controller.select_route(index)
    }

    /// Borrow the selection controller.
    pub const fn controller(&self) -> &SelectionController<R> {
        &self.controller
    }

    /// Mutably borrow the selection controller.
    pub const fn controller_mut(&mut self) -> &mut SelectionController<R> {
        &mut self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransportError;
    use crate::test_support::{RecordingRenderer, StubGeocoder, StubRouter, sample_route};
    use rstest::{fixture, rstest};

    const ORIGIN: Coord<f64> = Coord {
        x: -0.09,
        y: 51.505,
    };

    #[fixture]
    fn session() -> SearchSession<RecordingRenderer> {
        let mut session = SearchSession::new(RecordingRenderer::default());
        session.set_origin(ORIGIN);
        session
    }

    #[fixture]
    fn geocoder() -> StubGeocoder {
        StubGeocoder::found(Coord { x: -0.08, y: 51.51 }, "Bank, London")
    }

    #[rstest]
    fn missing_origin_is_an_input_error() {
        let mut session = SearchSession::new(RecordingRenderer::default());
        let err = session.begin_search("Bank").expect_err("no origin");
        assert_eq!(err, SearchError::MissingOrigin);
        assert_eq!(err.kind(), SearchErrorKind::Input);
        assert_eq!(session.generation(), Generation(0));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_destination_is_an_input_error(
        mut session: SearchSession<RecordingRenderer>,
        #[case] destination: &str,
    ) {
        let err = session.begin_search(destination).expect_err("blank");
        assert_eq!(err, SearchError::MissingDestination);
        assert!(!session.is_pending());
    }

    #[rstest]
    fn generations_increase(mut session: SearchSession<RecordingRenderer>) {
        let first = session.begin_search("A").expect("ticket");
        let second = session.begin_search("B").expect("ticket");
        assert!(second.generation() > first.generation());
        assert_eq!(second.destination(), "B");
    }

    #[rstest]
    #[tokio::test]
    async fn stale_outcome_is_dropped(
        mut session: SearchSession<RecordingRenderer>,
        geocoder: StubGeocoder,
    ) {
        let router = StubRouter::with_routes(vec![sample_route(1_000.0, 5)]);
        let first = session.begin_search("A").expect("ticket");
        let _second = session.begin_search("B").expect("ticket");

        let outcome = fetch_routes(first, &geocoder, &router).await;
        let status = session.apply(outcome).expect("stale is not an error");

        assert_eq!(
            status,
            SearchStatus::Stale {
                generation: Generation(1)
            }
        );
        assert!(session.controller().is_empty());
        assert!(session.is_pending());
    }

    #[rstest]
    fn new_search_starts_without_diagnostics(mut session: SearchSession<RecordingRenderer>) {
        for _ in 0..3 {
            let ticket = session.begin_search("Bank").expect("ticket");
            assert!(session.controller().diagnostics().is_empty());

            let routes = vec![sample_route(1_000.0, 4), sample_route(2_000.0, 6)];
            session
                .apply(SearchOutcome::new(ticket.generation(), Ok(routes)))
                .expect("loaded");
            assert!(session.select_route(1));

            assert_eq!(session.controller().selected_index(), Some(1));
            // Load and select each report both unlayered routes.
            assert_eq!(session.controller().diagnostics().len(), 4);
        }
    }

    #[rstest]
    fn repeat_delivery_is_dropped(mut session: SearchSession<RecordingRenderer>) {
        let ticket = session.begin_search("A").expect("ticket");
        let generation = ticket.generation();
        let routes = vec![sample_route(1_000.0, 5)];

        let first = session.apply(SearchOutcome::new(generation, Ok(routes.clone())));
        let second = session.apply(SearchOutcome::new(generation, Ok(routes)));

        assert_eq!(first, Ok(SearchStatus::Loaded { routes: 1 }));
        assert_eq!(second, Ok(SearchStatus::Stale { generation }));
    }

    #[rstest]
    #[tokio::test]
    async fn not_found_is_distinct_from_empty(mut session: SearchSession<RecordingRenderer>) {
        let geocoder = StubGeocoder::not_found();
        let router = StubRouter::with_routes(Vec::new());

        let err = session
            .search("Atlantis", &geocoder, &router)
            .await
            .expect_err("not found");

        assert_eq!(
            err,
            SearchError::DestinationNotFound {
                query: "Atlantis".into()
            }
        );
        assert_eq!(router.calls(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_routes_report_no_routes(
        mut session: SearchSession<RecordingRenderer>,
        geocoder: StubGeocoder,
    ) {
        let router = StubRouter::with_routes(Vec::new());
        let err = session
            .search("Bank", &geocoder, &router)
            .await
            .expect_err("empty");
        assert_eq!(err, SearchError::NoRoutes);
        assert_eq!(err.kind(), SearchErrorKind::EmptyResult);
    }

    #[rstest]
    #[tokio::test]
    async fn routing_failure_is_retryable(
        mut session: SearchSession<RecordingRenderer>,
        geocoder: StubGeocoder,
    ) {
        let router = StubRouter::with_error(RoutingError::Transport(TransportError::Network {
            url: "http://osrm.test/route".into(),
            message: "connection refused".into(),
        }));
        let err = session
            .search("Bank", &geocoder, &router)
            .await
            .expect_err("routing failure");
        assert!(err.is_retryable());
        assert!(!session.is_pending());
    }

    #[rstest]
    #[tokio::test]
    async fn successful_search_selects_safest(
        mut session: SearchSession<RecordingRenderer>,
        geocoder: StubGeocoder,
    ) {
        let router = StubRouter::with_routes(vec![
            sample_route(2_000.0, 20),
            sample_route(100.0, 2),
            sample_route(3_000.0, 40),
        ]);

        let status = session
            .search("Bank", &geocoder, &router)
            .await
            .expect("routes");

        assert_eq!(status, SearchStatus::Loaded { routes: 3 });
        let controller = session.controller();
        assert_eq!(controller.selected_index(), Some(0));
        let routes = controller.routes().expect("loaded");
        let scores: Vec<u8> = routes.iter().map(crate::ScoredRoute::score).collect();
        assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
    }
}
