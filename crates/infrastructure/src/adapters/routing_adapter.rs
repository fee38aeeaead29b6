//! Routing adapter - Implements RoutingPort using integration_osm

use application::error::ApplicationError;
use application::ports::RoutingPort;
use async_trait::async_trait;
use domain::{RoutePath, RouteRequest};
use integration_osm::{CyclingRoute, OsrmConfig, OsrmRoutingClient, RoutingClient, RoutingError};
use tracing::{debug, instrument, warn};

/// Bicycle routing backed by an OSRM server
pub struct OsrmRoutingAdapter {
    client: OsrmRoutingClient,
}

impl std::fmt::Debug for OsrmRoutingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsrmRoutingAdapter")
            .field("client", &"OsrmRoutingClient")
            .finish()
    }
}

impl OsrmRoutingAdapter {
    pub const fn new(client: OsrmRoutingClient) -> Self {
        Self { client }
    }

    /// Create the adapter and its HTTP client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn from_config(config: &OsrmConfig) -> Result<Self, ApplicationError> {
        let client = OsrmRoutingClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::new(client))
    }

    fn convert_route(route: CyclingRoute) -> RoutePath {
        RoutePath {
            distance_meters: route.distance,
            duration_seconds: route.duration,
            coordinates: route.geometry,
        }
    }

    fn convert_error(error: RoutingError) -> ApplicationError {
        match error {
            RoutingError::InvalidRequest(msg) => ApplicationError::InvalidRequest(msg),
            RoutingError::Malformed(msg) => ApplicationError::RoutingMalformed(msg),
            other => ApplicationError::RoutingUnavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl RoutingPort for OsrmRoutingAdapter {
    #[instrument(skip(self, request), fields(points = request.len()))]
    async fn route(&self, request: &RouteRequest) -> Result<Option<RoutePath>, ApplicationError> {
        let route = self.client.route(request.points()).await.map_err(|e| {
            warn!(error = %e, "Route request failed");
            Self::convert_error(e)
        })?;

        match route {
            Some(route) => {
                debug!(
                    distance = route.distance,
                    points = route.point_count(),
                    "Route received"
                );
                Ok(Some(Self::convert_route(route)))
            },
            None => {
                debug!("No route between the requested points");
                Ok(None)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use domain::GeoPoint;

    use super::*;

    #[test]
    fn test_convert_route_preserves_geometry_order() {
        let geometry = vec![
            GeoPoint::new(38.5, -120.2).unwrap(),
            GeoPoint::new(40.7, -120.95).unwrap(),
            GeoPoint::new(43.252, -126.453).unwrap(),
        ];
        let path = OsrmRoutingAdapter::convert_route(CyclingRoute {
            distance: 462_000.0,
            duration: 72_000.0,
            geometry: geometry.clone(),
        });

        assert!((path.distance_meters - 462_000.0).abs() < f64::EPSILON);
        assert!((path.duration_seconds - 72_000.0).abs() < f64::EPSILON);
        assert_eq!(path.coordinates, geometry);
    }

    #[test]
    fn test_convert_error() {
        assert!(matches!(
            OsrmRoutingAdapter::convert_error(RoutingError::InvalidRequest("1 point".into())),
            ApplicationError::InvalidRequest(_)
        ));
        assert!(matches!(
            OsrmRoutingAdapter::convert_error(RoutingError::Malformed("geometry".into())),
            ApplicationError::RoutingMalformed(_)
        ));
        assert!(matches!(
            OsrmRoutingAdapter::convert_error(RoutingError::ConnectionFailed("refused".into())),
            ApplicationError::RoutingUnavailable(_)
        ));
    }
}
