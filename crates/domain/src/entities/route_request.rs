//! Ordered coordinate list sent to the routing service

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::GeoPoint;

/// Ordered points of a route: start, resolved waypoints, end
///
/// Always holds at least two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRouteRequest")]
pub struct RouteRequest {
    points: Vec<GeoPoint>,
}

#[derive(Deserialize)]
struct RawRouteRequest {
    points: Vec<GeoPoint>,
}

impl TryFrom<RawRouteRequest> for RouteRequest {
    type Error = DomainError;

    fn try_from(raw: RawRouteRequest) -> Result<Self, Self::Error> {
        Self::new(raw.points)
    }
}

impl RouteRequest {
    /// Create a request from ordered points
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InsufficientPoints` for fewer than two points.
    pub fn new(points: Vec<GeoPoint>) -> Result<Self, DomainError> {
        if points.len() < 2 {
            return Err(DomainError::InsufficientPoints(points.len()));
        }
        Ok(Self { points })
    }

    /// Points in travel order
    #[must_use]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Number of points, including both endpoints
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<RouteRequest> for Vec<GeoPoint> {
    fn from(request: RouteRequest) -> Self {
        request.points
    }
}
