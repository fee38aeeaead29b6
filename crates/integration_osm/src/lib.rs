//! OpenStreetMap service integration for Veloroute
//!
//! Provides place search via [Nominatim](https://nominatim.openstreetmap.org)
//! and bicycle routing via an [OSRM](https://router.project-osrm.org) server.
//!
//! # Architecture
//!
//! The crate follows a client-trait pattern consistent with other integration crates.
//! [`GeocodingClient`] handles text-to-candidate lookups, implemented by
//! [`NominatimGeocodingClient`]. [`RoutingClient`] turns an ordered list of points
//! into a route, implemented by [`OsrmRoutingClient`]. The [`polyline`] module
//! decodes OSRM's compact geometry encoding.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_osm::{OsrmConfig, OsrmRoutingClient, RoutingClient};
//!
//! let client = OsrmRoutingClient::new(&OsrmConfig::default())?;
//! let route = client.route(&[paris, lyon]).await?;
//! ```

mod client;
mod config;
mod error;
mod geocoding;
mod models;
pub mod polyline;

pub use client::{OsrmRoutingClient, RoutingClient, coordinate_path};
pub use config::{NominatimConfig, OsrmConfig};
pub use error::{GeocodingError, RoutingError};
pub use geocoding::{GeocodingClient, NominatimGeocodingClient};
pub use models::{CyclingRoute, Place};
pub use polyline::PolylineError;
