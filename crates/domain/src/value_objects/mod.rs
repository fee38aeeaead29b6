//! Value Objects - Immutable, identity-less domain primitives

mod geo_point;
mod waypoint_id;

pub use geo_point::GeoPoint;
pub use waypoint_id::WaypointId;
