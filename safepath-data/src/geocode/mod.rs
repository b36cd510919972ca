//! Geocoding gateways backed by a Nominatim server.
//!
//! [`NominatimGateway`] implements both [`safepath_core::GeocodeGateway`]
//! and [`safepath_core::ReverseGeocodeGateway`].
//!
//! # Example
//!
//! ```no_run
//! use safepath_core::GeocodeGateway;
//! use safepath_data::geocode::{NominatimConfig, NominatimGateway};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = NominatimGateway::with_config(
//!     NominatimConfig::default().with_user_agent("my-app/1.0 (ops@example.com)"),
//! )?;
//! let place = gateway.geocode("Tower Bridge, London").await?;
//! println!("{} at {:?}", place.display_name, place.location);
//! # Ok(())
//! # }
//! ```

mod nominatim;
mod provider;

pub use provider::{DEFAULT_NOMINATIM_URL, NominatimConfig, NominatimGateway};
