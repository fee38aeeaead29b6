//! Route form state machine
//!
//! Collects the start, the end and the ordered waypoints of a route:
//!
//! ```text
//! Idle ──focus/type start──▶ EditingStart ──submit/select──▶ EditingEnd ──submit/select──▶ Summary
//!   └──────────────focus/type end──────────────────────────────▲
//! ```
//!
//! Under [`SummaryEditing::Locked`] a resolved start or end becomes read-only
//! once the summary is reached. An endpoint still lacking a position stays
//! editable until a candidate is selected for it.

use std::sync::Arc;

use domain::{
    DomainError, GeocodeCandidate, RouteEndpoint, RouteInputState, RouteRequest, Waypoint,
    WaypointId,
};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::debounced_search::DebouncedSearch;
use super::planner_settings::{PlannerSettings, SummaryEditing};
use super::route_builder::RoutePointBuilder;
use super::waypoint_list::WaypointList;
use crate::ports::GeocodingPort;

/// Operation not allowed in the current form state
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// A resolved start or end is read-only in the summary
    #[error("Resolved start and end cannot be edited once the route summary is shown")]
    EndpointLocked,

    /// Waypoints are edited from the summary only
    #[error("Waypoints can only be edited in the route summary (current state: {0})")]
    NotInSummary(RouteInputState),

    /// Unknown waypoint or invalid order
    #[error(transparent)]
    Waypoint(#[from] DomainError),
}

/// Read-only view of the route form handed to the display layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteInputSnapshot {
    pub state: RouteInputState,
    pub start: RouteEndpoint,
    pub end: RouteEndpoint,
    pub waypoints: Vec<Waypoint>,
    pub start_candidates: Vec<GeocodeCandidate>,
    pub end_candidates: Vec<GeocodeCandidate>,
    /// The waypoint whose candidate list is open, with its candidates
    pub active_waypoint: Option<(WaypointId, Vec<GeocodeCandidate>)>,
}

/// Start, end and waypoints of the route being built
#[derive(Debug)]
pub struct RouteInput {
    policy: SummaryEditing,
    state: RouteInputState,
    start: RouteEndpoint,
    end: RouteEndpoint,
    start_search: DebouncedSearch,
    end_search: DebouncedSearch,
    waypoints: WaypointList,
}

impl RouteInput {
    /// Create an empty form in [`RouteInputState::Idle`]
    pub fn new(geocoder: Arc<dyn GeocodingPort>, settings: &PlannerSettings) -> Self {
        Self {
            policy: settings.summary_editing,
            state: RouteInputState::Idle,
            start: RouteEndpoint::default(),
            end: RouteEndpoint::default(),
            start_search: DebouncedSearch::new(
                Arc::clone(&geocoder),
                settings.endpoint_search(),
            ),
            end_search: DebouncedSearch::new(Arc::clone(&geocoder), settings.endpoint_search()),
            waypoints: WaypointList::new(geocoder, settings.waypoint_search()),
        }
    }

    pub const fn state(&self) -> RouteInputState {
        self.state
    }

    pub const fn policy(&self) -> SummaryEditing {
        self.policy
    }

    pub const fn start(&self) -> &RouteEndpoint {
        &self.start
    }

    pub const fn end(&self) -> &RouteEndpoint {
        &self.end
    }

    pub const fn waypoints(&self) -> &WaypointList {
        &self.waypoints
    }

    /// Search field behind the start input
    pub const fn start_search(&self) -> &DebouncedSearch {
        &self.start_search
    }

    /// Search field behind the end input
    pub const fn end_search(&self) -> &DebouncedSearch {
        &self.end_search
    }

    /// Focus the start field
    pub fn focus_start(&mut self) -> Result<(), InputError> {
        self.ensure_editable(&self.start)?;
        self.end_search.dismiss();
        self.enter_unless_summary(RouteInputState::EditingStart);
        Ok(())
    }

    /// Type into the start field
    pub fn set_start_text(&mut self, text: &str) -> Result<(), InputError> {
        self.focus_start()?;
        self.start.set_label(text);
        self.start_search.update_query(text);
        Ok(())
    }

    /// Confirm the typed start label without picking a candidate
    ///
    /// Returns whether the form moved on to the end field. Only applies
    /// while the start field is being edited and its label is not blank.
    pub fn submit_start(&mut self) -> bool {
        let editing_start = matches!(
            self.state,
            RouteInputState::Idle | RouteInputState::EditingStart
        );
        if !editing_start || self.start.label.trim().is_empty() {
            return false;
        }
        self.start_search.dismiss();
        self.transition(RouteInputState::EditingEnd);
        true
    }

    /// Resolve the start from a candidate and move on to the end field
    pub fn select_start(&mut self, candidate: &GeocodeCandidate) -> Result<(), InputError> {
        self.ensure_editable(&self.start)?;
        self.start.resolve(candidate);
        self.start_search.dismiss();
        self.enter_unless_summary(RouteInputState::EditingEnd);
        Ok(())
    }

    /// Focus the end field
    pub fn focus_end(&mut self) -> Result<(), InputError> {
        self.ensure_editable(&self.end)?;
        self.start_search.dismiss();
        self.enter_unless_summary(RouteInputState::EditingEnd);
        Ok(())
    }

    /// Type into the end field
    pub fn set_end_text(&mut self, text: &str) -> Result<(), InputError> {
        self.focus_end()?;
        self.end.set_label(text);
        self.end_search.update_query(text);
        Ok(())
    }

    /// Confirm the typed end label and show the summary
    ///
    /// Only applies while the end field is being edited and its label is not
    /// blank.
    pub fn submit_end(&mut self) -> bool {
        if self.state != RouteInputState::EditingEnd || self.end.label.trim().is_empty() {
            return false;
        }
        self.end_search.dismiss();
        self.transition(RouteInputState::Summary);
        true
    }

    /// Resolve the end from a candidate and show the summary
    pub fn select_end(&mut self, candidate: &GeocodeCandidate) -> Result<(), InputError> {
        self.ensure_editable(&self.end)?;
        self.end.resolve(candidate);
        self.end_search.dismiss();
        self.transition(RouteInputState::Summary);
        Ok(())
    }

    /// Append an empty waypoint ("add step")
    pub fn add_waypoint(&mut self) -> Result<WaypointId, InputError> {
        self.ensure_summary()?;
        Ok(self.waypoints.add())
    }

    pub fn update_waypoint_label(&mut self, id: WaypointId, text: &str) -> Result<(), InputError> {
        self.ensure_summary()?;
        self.waypoints.update_label(id, text)?;
        Ok(())
    }

    pub fn focus_waypoint(&mut self, id: WaypointId) -> Result<(), InputError> {
        self.ensure_summary()?;
        self.waypoints.focus(id)?;
        Ok(())
    }

    pub fn select_waypoint_candidate(
        &mut self,
        id: WaypointId,
        candidate: &GeocodeCandidate,
    ) -> Result<(), InputError> {
        self.ensure_summary()?;
        self.waypoints.select_candidate(id, candidate)?;
        Ok(())
    }

    /// Remove a waypoint; returns whether it existed
    pub fn remove_waypoint(&mut self, id: WaypointId) -> Result<bool, InputError> {
        self.ensure_summary()?;
        Ok(self.waypoints.remove(id))
    }

    pub fn reorder_waypoints(&mut self, order: &[WaypointId]) -> Result<(), InputError> {
        self.ensure_summary()?;
        self.waypoints.reorder(order)?;
        Ok(())
    }

    /// Points to route through, `None` while an endpoint is unresolved
    pub fn route_request(&self) -> Option<RouteRequest> {
        RoutePointBuilder::build(&self.start, self.waypoints.waypoints(), &self.end)
    }

    pub fn snapshot(&self) -> RouteInputSnapshot {
        RouteInputSnapshot {
            state: self.state,
            start: self.start.clone(),
            end: self.end.clone(),
            waypoints: self.waypoints.waypoints().to_vec(),
            start_candidates: self.start_search.results(),
            end_candidates: self.end_search.results(),
            active_waypoint: self.waypoints.active_candidates(),
        }
    }

    /// Wait until no field has a pending or running lookup
    pub async fn settled(&self) {
        self.start_search.settled().await;
        self.end_search.settled().await;
        self.waypoints.settled().await;
    }

    /// An unresolved endpoint stays editable in a locked summary
    fn ensure_editable(&self, endpoint: &RouteEndpoint) -> Result<(), InputError> {
        if self.state.is_summary()
            && self.policy == SummaryEditing::Locked
            && endpoint.is_resolved()
        {
            return Err(InputError::EndpointLocked);
        }
        Ok(())
    }

    fn ensure_summary(&self) -> Result<(), InputError> {
        if self.state.is_summary() {
            Ok(())
        } else {
            Err(InputError::NotInSummary(self.state))
        }
    }

    fn enter_unless_summary(&mut self, next: RouteInputState) {
        if !self.state.is_summary() {
            self.transition(next);
        }
    }

    fn transition(&mut self, next: RouteInputState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, "Route input state changed");
            self.state = next;
        }
    }
}
