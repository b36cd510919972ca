//! Boundaries to the external geocoding and routing services.
//!
//! The engine depends only on these traits. Adapters for concrete services
//! (Nominatim, OSRM) live in `safepath-data`; deterministic doubles live in
//! [`crate::test_support`].
//!
//! Gateways are asynchronous because their only job is a network round
//! trip. They are not required to be `Send`: a search session runs on a
//! single cooperative event loop.

mod error;
mod provider;

pub use error::{GeocodeError, RoutingError, TransportError};
pub use provider::{GeocodeGateway, Place, ReverseGeocodeGateway, RoutingGateway};
