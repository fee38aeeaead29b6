//! Application services - route building use cases

mod debounced_search;
mod planner_settings;
mod route_builder;
mod route_input;
mod route_planner;
mod route_session;
mod waypoint_list;

pub use debounced_search::{DebouncedSearch, SearchSettings, SearchSnapshot};
pub use planner_settings::{PlannerSettings, RouteTrigger, SummaryEditing};
pub use route_builder::RoutePointBuilder;
pub use route_input::{InputError, RouteInput, RouteInputSnapshot};
pub use route_planner::RoutePlanner;
pub use route_session::{ComputeOutcome, RouteFailure, RouteSession, SessionSnapshot};
pub use waypoint_list::WaypointList;
