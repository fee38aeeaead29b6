//! Domain layer for Veloroute
//!
//! Contains the route-building vocabulary: points, candidates, waypoints,
//! route requests and computed paths. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
