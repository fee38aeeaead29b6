//! OSRM routing client
//!
//! Requests bicycle routes from an [OSRM](https://project-osrm.org) server
//! and decodes the precision-5 polyline geometry of the first route.

use std::time::Duration;

use async_trait::async_trait;
use domain::GeoPoint;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::OsrmConfig;
use crate::error::RoutingError;
use crate::models::CyclingRoute;
use crate::polyline;

/// OSRM status code for "no path between the given points"
const NO_ROUTE_CODE: &str = "NoRoute";

/// Trait for routing service clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Route through `points` in order
    ///
    /// Returns `Ok(None)` when the service finds no viable path.
    async fn route(&self, points: &[GeoPoint]) -> Result<Option<CyclingRoute>, RoutingError>;
}

/// OSRM HTTP API client
#[derive(Debug)]
pub struct OsrmRoutingClient {
    client: Client,
    config: OsrmConfig,
}

impl OsrmRoutingClient {
    /// Create a new OSRM routing client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &OsrmConfig) -> Result<Self, RoutingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RoutingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Build the `/route` URL for `points` (coordinates as `lon,lat;lon,lat`)
    #[must_use]
    pub fn route_url(&self, points: &[GeoPoint]) -> String {
        format!(
            "{}/route/v1/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coordinate_path(points)
        )
    }

    /// Parse an OSRM route response body
    fn parse_route_response(body: &str) -> Result<Option<CyclingRoute>, RoutingError> {
        let raw: RawRouteResponse =
            serde_json::from_str(body).map_err(|e| RoutingError::Malformed(e.to_string()))?;

        let Some(route) = raw.routes.into_iter().next() else {
            debug!(code = ?raw.code, "Routing response contains no routes");
            return Ok(None);
        };

        let geometry = polyline::decode(&route.geometry)
            .map_err(|e| RoutingError::Malformed(e.to_string()))?
            .into_iter()
            .map(|(lat, lon)| GeoPoint::new(lat, lon))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RoutingError::Malformed(e.to_string()))?;

        Ok(Some(CyclingRoute {
            distance: route.distance,
            duration: route.duration,
            geometry,
        }))
    }

    /// Whether an error body is OSRM's "no route" answer
    fn is_no_route(body: &str) -> bool {
        serde_json::from_str::<RawRouteResponse>(body)
            .ok()
            .and_then(|r| r.code)
            .is_some_and(|code| code == NO_ROUTE_CODE)
    }
}

/// Format points as the OSRM coordinate path segment
#[must_use]
pub fn coordinate_path(points: &[GeoPoint]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.longitude(), p.latitude()))
        .collect::<Vec<_>>()
        .join(";")
}

#[async_trait]
impl RoutingClient for OsrmRoutingClient {
    #[instrument(skip(self, points), fields(points = points.len()))]
    async fn route(&self, points: &[GeoPoint]) -> Result<Option<CyclingRoute>, RoutingError> {
        if points.len() < 2 {
            return Err(RoutingError::InvalidRequest(format!(
                "at least 2 points required, got {}",
                points.len()
            )));
        }

        let url = self.route_url(points);
        let params = [("overview", "full"), ("geometries", "polyline")];

        debug!(%url, "Requesting route");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RoutingError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    RoutingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RoutingError::Malformed(e.to_string()))?;

        if !status.is_success() {
            if Self::is_no_route(&body) {
                debug!(%status, "Routing service found no route");
                return Ok(None);
            }
            warn!(%status, "Routing request failed");
            return Err(RoutingError::Unavailable(format!("HTTP {status}")));
        }

        let route = Self::parse_route_response(&body)?;
        if let Some(route) = &route {
            debug!(
                distance = route.distance,
                duration = route.duration,
                points = route.point_count(),
                "Route received"
            );
        }
        Ok(route)
    }
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawRouteResponse {
    code: Option<String>,
    #[serde(default)]
    routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    distance: f64,
    duration: f64,
    geometry: String,
}
