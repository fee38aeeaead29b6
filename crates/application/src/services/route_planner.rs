//! Route planner facade
//!
//! Couples the route form with the route session and decides when a route
//! is computed according to [`RouteTrigger`].

use std::sync::Arc;

use domain::{GeocodeCandidate, MapRegion, RouteRequest, WaypointId};
use tracing::debug;

use super::planner_settings::{PlannerSettings, RouteTrigger};
use super::route_input::{InputError, RouteInput, RouteInputSnapshot};
use super::route_session::{ComputeOutcome, RouteSession, SessionSnapshot};
use crate::ports::{GeocodingPort, RoutingPort};

/// Everything the display layer needs to build and show a route
#[derive(Debug)]
pub struct RoutePlanner {
    input: RouteInput,
    session: RouteSession,
    trigger: RouteTrigger,
    last_requested: Option<RouteRequest>,
}

impl RoutePlanner {
    pub fn new(
        geocoder: Arc<dyn GeocodingPort>,
        router: Arc<dyn RoutingPort>,
        settings: &PlannerSettings,
    ) -> Self {
        Self {
            input: RouteInput::new(geocoder, settings),
            session: RouteSession::new(router),
            trigger: settings.route_trigger,
            last_requested: None,
        }
    }

    pub const fn input(&self) -> &RouteInput {
        &self.input
    }

    pub const fn session(&self) -> &RouteSession {
        &self.session
    }

    pub const fn trigger(&self) -> RouteTrigger {
        self.trigger
    }

    pub fn input_snapshot(&self) -> RouteInputSnapshot {
        self.input.snapshot()
    }

    pub fn session_snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Map region to show: the current route framed, or `fallback`
    pub fn map_region(&self, fallback: MapRegion) -> MapRegion {
        self.session
            .current_path()
            .map_or(fallback, |path| MapRegion::framing(&path, fallback))
    }

    pub fn focus_start(&mut self) -> Result<(), InputError> {
        self.input.focus_start()
    }

    pub fn set_start_text(&mut self, text: &str) -> Result<(), InputError> {
        self.input.set_start_text(text)
    }

    pub fn submit_start(&mut self) -> bool {
        self.input.submit_start()
    }

    pub async fn select_start(&mut self, candidate: &GeocodeCandidate) -> Result<(), InputError> {
        self.input.select_start(candidate)?;
        self.maybe_recompute().await;
        Ok(())
    }

    pub fn focus_end(&mut self) -> Result<(), InputError> {
        self.input.focus_end()
    }

    pub fn set_end_text(&mut self, text: &str) -> Result<(), InputError> {
        self.input.set_end_text(text)
    }

    pub fn submit_end(&mut self) -> bool {
        self.input.submit_end()
    }

    pub async fn select_end(&mut self, candidate: &GeocodeCandidate) -> Result<(), InputError> {
        self.input.select_end(candidate)?;
        self.maybe_recompute().await;
        Ok(())
    }

    pub fn add_waypoint(&mut self) -> Result<WaypointId, InputError> {
        self.input.add_waypoint()
    }

    pub fn update_waypoint_label(&mut self, id: WaypointId, text: &str) -> Result<(), InputError> {
        self.input.update_waypoint_label(id, text)
    }

    pub fn focus_waypoint(&mut self, id: WaypointId) -> Result<(), InputError> {
        self.input.focus_waypoint(id)
    }

    pub async fn select_waypoint_candidate(
        &mut self,
        id: WaypointId,
        candidate: &GeocodeCandidate,
    ) -> Result<(), InputError> {
        self.input.select_waypoint_candidate(id, candidate)?;
        self.maybe_recompute().await;
        Ok(())
    }

    pub async fn remove_waypoint(&mut self, id: WaypointId) -> Result<bool, InputError> {
        let removed = self.input.remove_waypoint(id)?;
        if removed {
            self.maybe_recompute().await;
        }
        Ok(removed)
    }

    pub async fn reorder_waypoints(&mut self, order: &[WaypointId]) -> Result<(), InputError> {
        self.input.reorder_waypoints(order)?;
        self.maybe_recompute().await;
        Ok(())
    }

    /// Compute the route for the current form ("confirm route")
    pub async fn confirm_route(&mut self) -> Result<ComputeOutcome, InputError> {
        let state = self.input.state();
        if !state.is_summary() {
            return Err(InputError::NotInSummary(state));
        }
        self.last_requested = self.input.route_request();
        let input = &self.input;
        Ok(self
            .session
            .compute_route(input.start(), input.waypoints().waypoints(), input.end())
            .await)
    }

    /// Wait until no input field has a pending or running lookup
    pub async fn settled(&self) {
        self.input.settled().await;
    }

    async fn maybe_recompute(&mut self) {
        if self.trigger != RouteTrigger::WhenEndpointsResolved {
            return;
        }
        let Some(request) = self.input.route_request() else {
            return;
        };
        if self.last_requested.as_ref() == Some(&request) {
            debug!("Resolved points unchanged, keeping current route");
            return;
        }
        self.session.compute_request(&request).await;
        self.last_requested = Some(request);
    }
}
