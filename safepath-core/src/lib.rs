//! Core domain types for the SafePath route engine.
//!
//! A search resolves a destination, fetches candidate [`Route`]s, rates each
//! one with a [`RouteScorer`], [`rank`]s them safest first and hands the list
//! to a [`SelectionController`], which keeps exactly one route selected and
//! restyles the map through a [`MapRenderer`].
//!
//! Nothing in this crate performs I/O. Geocoding, routing, drawing and
//! notification are capabilities supplied by the caller through the traits
//! in [`gateway`], [`render`] and [`alert`].

#![forbid(unsafe_code)]

pub mod alert;
pub mod gateway;
mod rank;
pub mod render;
mod route;
mod safety;
mod scorer;
pub mod search;
mod selection;

#[doc(hidden)]
pub mod test_support;

pub use alert::{
    Ack, AlertError, AlertMessage, AlertReceipt, AlertRequest, EmergencyContact,
    NotificationChannel, NotificationError, UNKNOWN_LOCATION, compose_alert, map_link,
    send_emergency_alert,
};
pub use gateway::{
    GeocodeError, GeocodeGateway, Place, ReverseGeocodeGateway, RoutingError, RoutingGateway,
    TransportError,
};
pub use rank::{RankedRouteList, ScoredRoute, rank, score_routes};
pub use render::{
    Diagnostic, MUTED_COLOR, MapRenderer, RenderError, RenderFailure, RouteStyle,
    SelectionRangeError,
};
pub use route::{LayerHandle, MIN_ROUTE_POINTS, Route, RouteError};
pub use safety::{
    HIGH_THRESHOLD, MAX_SCORE, MIN_SCORE, MODERATE_THRESHOLD, SafetyLevel, SafetyRating,
};
pub use scorer::{RouteScorer, SyntheticScorer};
pub use search::{
    Generation, SearchError, SearchErrorKind, SearchOutcome, SearchSession, SearchStatus,
    SearchTicket, fetch_routes,
};
pub use selection::{SelectionController, SelectionState};
