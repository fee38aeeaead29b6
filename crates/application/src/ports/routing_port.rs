//! Routing service port
//!
//! Defines the interface for path-finding between ordered points.
//! Adapters in the infrastructure layer implement this port using routing engines.

use async_trait::async_trait;
use domain::{RoutePath, RouteRequest};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for route computation
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoutingPort: Send + Sync {
    /// Compute a path through the request's points in order
    ///
    /// Returns `Ok(None)` when the service reports that no viable path exists.
    async fn route(&self, request: &RouteRequest) -> Result<Option<RoutePath>, ApplicationError>;
}
