//! Facade crate for the SafePath route engine.
//!
//! This crate re-exports the core domain types and exposes the HTTP gateways
//! for Nominatim and OSRM behind the `http` feature.

#![forbid(unsafe_code)]

pub use safepath_core::{
    AlertError, AlertReceipt, AlertRequest, Diagnostic, EmergencyContact, GeocodeError,
    GeocodeGateway, Generation, LayerHandle, MapRenderer, NotificationChannel, Place,
    RankedRouteList, RenderError, ReverseGeocodeGateway, Route, RouteScorer, RouteStyle,
    RoutingError, RoutingGateway, SafetyLevel, SafetyRating, ScoredRoute, SearchError,
    SearchOutcome, SearchSession, SearchStatus, SearchTicket, SelectionController,
    SelectionState, SyntheticScorer, TransportError, fetch_routes, rank, score_routes,
    send_emergency_alert,
};

#[cfg(feature = "http")]
pub use safepath_data::geocode::{NominatimConfig, NominatimGateway};
#[cfg(feature = "http")]
pub use safepath_data::routing::{OsrmConfig, OsrmRoutingGateway};
#[cfg(feature = "http")]
pub use safepath_data::GatewayBuildError;
