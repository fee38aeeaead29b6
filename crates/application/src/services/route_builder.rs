//! Assembles the ordered points of a route request

use domain::{RouteEndpoint, RouteRequest, Waypoint};

/// Turns the route form into a [`RouteRequest`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutePointBuilder;

impl RoutePointBuilder {
    /// Start, every resolved waypoint in list order, then end
    ///
    /// Returns `None` while either endpoint is unresolved. Unresolved
    /// waypoints are skipped.
    #[must_use]
    pub fn build(
        start: &RouteEndpoint,
        waypoints: &[Waypoint],
        end: &RouteEndpoint,
    ) -> Option<RouteRequest> {
        let first = start.position?;
        let last = end.position?;

        let mut points = Vec::with_capacity(waypoints.len() + 2);
        points.push(first);
        points.extend(waypoints.iter().filter_map(|w| w.position));
        points.push(last);

        RouteRequest::new(points).ok()
    }
}
