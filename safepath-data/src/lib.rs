//! HTTP adapters for the SafePath route engine.
//!
//! Responsibilities:
//! - Implement the gateway traits from `safepath-core` over public web
//!   services: Nominatim for (reverse) geocoding and OSRM for routing.
//! - Translate service payloads into validated domain types.
//! - Map transport failures onto [`safepath_core::TransportError`].
//!
//! Boundaries:
//! - Do not encode domain rules (live in `safepath-core`).
//! - Never retry; callers decide whether a failure is worth repeating.

mod http;

pub mod geocode;
pub mod routing;

pub use http::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, GatewayBuildError};
