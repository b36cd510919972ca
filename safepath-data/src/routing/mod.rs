//! Routing gateway backed by an OSRM server.
//!
//! [`OsrmRoutingGateway`] implements [`safepath_core::RoutingGateway`] using
//! OSRM's Route API with alternatives enabled, so one request yields the
//! primary route followed by its alternatives.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use geo::Coord;
//! use safepath_core::RoutingGateway;
//! use safepath_data::routing::{OsrmConfig, OsrmRoutingGateway};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OsrmConfig::new("http://localhost:5000")
//!     .with_profile("foot")
//!     .with_timeout(Duration::from_secs(10));
//! let gateway = OsrmRoutingGateway::with_config(config)?;
//!
//! let routes = gateway
//!     .find_routes(Coord { x: -0.09, y: 51.505 }, Coord { x: -0.08, y: 51.51 })
//!     .await?;
//! println!("{} candidate routes", routes.len());
//! # Ok(())
//! # }
//! ```

mod osrm;
mod provider;

pub use provider::{DEFAULT_OSRM_URL, DEFAULT_PROFILE, OsrmConfig, OsrmRoutingGateway};
