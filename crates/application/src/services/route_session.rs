//! Route computation state owned by the display layer
//!
//! Each computation takes a new generation. Only the completion whose
//! generation is still current updates the session, so a slow earlier
//! request can never overwrite the result of a later one.

use std::fmt;
use std::sync::Arc;

use domain::{RouteEndpoint, RoutePath, RouteRequest, Waypoint};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::route_builder::RoutePointBuilder;
use crate::error::ApplicationError;
use crate::ports::RoutingPort;

/// User-presentable reason the last computation produced no route
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteFailure {
    /// The service found no viable path
    #[error("no route found")]
    NoRoute,

    /// Transport failure or error status
    #[error("routing service unavailable")]
    ServiceUnavailable,

    #[error("invalid route request: {0}")]
    InvalidRequest(String),

    /// Start or end has no selected position
    #[error("select a start and an end before computing a route")]
    MissingEndpoints,

    #[error("routing response could not be read")]
    UnreadableResponse,
}

impl From<&ApplicationError> for RouteFailure {
    fn from(error: &ApplicationError) -> Self {
        match error {
            ApplicationError::InvalidRequest(msg) => Self::InvalidRequest(msg.clone()),
            ApplicationError::Domain(e) => Self::InvalidRequest(e.to_string()),
            ApplicationError::RoutingMalformed(_) | ApplicationError::GeocodeMalformed(_) => {
                Self::UnreadableResponse
            },
            ApplicationError::RoutingUnavailable(_)
            | ApplicationError::GeocodeUnavailable(_)
            | ApplicationError::Configuration(_) => Self::ServiceUnavailable,
        }
    }
}

/// Observable state of a [`RouteSession`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub current_path: Option<RoutePath>,
    /// A computation for the current generation is in flight
    pub is_loading: bool,
    pub last_error: Option<RouteFailure>,
    generation: u64,
}

/// What happened to a finished computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeOutcome {
    /// The result is now the session state
    Applied,
    /// A newer computation or a reset started meanwhile; the result was dropped
    Superseded,
}

/// Owner of the current route, its loading flag and its error banner
pub struct RouteSession {
    router: Arc<dyn RoutingPort>,
    state: watch::Sender<SessionSnapshot>,
}

impl fmt::Debug for RouteSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteSession")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl RouteSession {
    pub fn new(router: Arc<dyn RoutingPort>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self { router, state }
    }

    /// Build the request from the form and compute its route
    pub async fn compute_route(
        &self,
        start: &RouteEndpoint,
        waypoints: &[Waypoint],
        end: &RouteEndpoint,
    ) -> ComputeOutcome {
        match RoutePointBuilder::build(start, waypoints, end) {
            Some(request) => self.compute_request(&request).await,
            None => {
                self.state.send_modify(|s| {
                    s.generation += 1;
                    s.is_loading = false;
                    s.current_path = None;
                    s.last_error = Some(RouteFailure::MissingEndpoints);
                });
                ComputeOutcome::Applied
            },
        }
    }

    /// Compute the route for an already built request
    pub async fn compute_request(&self, request: &RouteRequest) -> ComputeOutcome {
        let mut generation = 0;
        self.state.send_modify(|s| {
            s.generation += 1;
            generation = s.generation;
            s.is_loading = true;
            s.last_error = None;
        });
        debug!(generation, points = request.len(), "Computing route");

        let _pending = PendingComputation {
            state: &self.state,
            generation,
        };
        let outcome = self.router.route(request).await;

        let applied = self.state.send_if_modified(|s| {
            if s.generation != generation {
                debug!(generation, current = s.generation, "Discarding stale route result");
                return false;
            }
            s.is_loading = false;
            match outcome {
                Ok(Some(path)) => {
                    info!(
                        distance_m = path.distance_meters,
                        duration_s = path.duration_seconds,
                        points = path.coordinates.len(),
                        "Route applied"
                    );
                    s.current_path = Some(path);
                    s.last_error = None;
                },
                Ok(None) => {
                    info!("Routing service found no route");
                    s.current_path = None;
                    s.last_error = Some(RouteFailure::NoRoute);
                },
                Err(e) => {
                    warn!(error = %e, "Route computation failed");
                    s.current_path = None;
                    s.last_error = Some(RouteFailure::from(&e));
                },
            }
            true
        });

        if applied {
            ComputeOutcome::Applied
        } else {
            ComputeOutcome::Superseded
        }
    }

    /// Hide the error banner
    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|s| s.last_error.take().is_some());
    }

    /// Drop the current route and invalidate any computation in flight
    pub fn clear(&self) {
        self.state.send_modify(|s| {
            s.generation += 1;
            s.current_path = None;
            s.is_loading = false;
            s.last_error = None;
        });
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn current_path(&self) -> Option<RoutePath> {
        self.state.borrow().current_path.clone()
    }

    /// Receive every state change of the session
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }
}

/// Clears the loading flag if a computation is dropped before it completes
struct PendingComputation<'a> {
    state: &'a watch::Sender<SessionSnapshot>,
    generation: u64,
}

impl Drop for PendingComputation<'_> {
    fn drop(&mut self) {
        let generation = self.generation;
        self.state.send_if_modified(|s| {
            if s.generation != generation || !s.is_loading {
                return false;
            }
            s.is_loading = false;
            true
        });
    }
}
