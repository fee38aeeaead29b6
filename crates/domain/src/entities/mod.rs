//! Domain entities - Objects with identity and lifecycle

mod geocode_candidate;
mod route_input_state;
mod route_path;
mod route_request;
mod waypoint;

pub use geocode_candidate::GeocodeCandidate;
pub use route_input_state::RouteInputState;
pub use route_path::{MapRegion, ROUTE_FRAME_PADDING, RouteBounds, RoutePath};
pub use route_request::RouteRequest;
pub use waypoint::{RouteEndpoint, Waypoint};
