//! Computed route geometry and the map region that frames it

use serde::{Deserialize, Serialize};

use crate::value_objects::GeoPoint;

/// Span multiplier applied around a route so it does not touch the map edges
pub const ROUTE_FRAME_PADDING: f64 = 1.5;

/// A drawable route returned by the routing service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePath {
    /// Total length in meters
    pub distance_meters: f64,

    /// Estimated riding time in seconds
    pub duration_seconds: f64,

    /// Decoded geometry in travel order
    pub coordinates: Vec<GeoPoint>,
}

impl RoutePath {
    /// Total length in kilometers
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    /// Estimated riding time in whole minutes, rounded
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn duration_minutes(&self) -> u64 {
        (self.duration_seconds.max(0.0) / 60.0).round() as u64
    }

    /// Bounding box of the geometry, `None` when it has no points
    #[must_use]
    pub fn bounds(&self) -> Option<RouteBounds> {
        RouteBounds::from_points(&self.coordinates)
    }
}

/// Axis-aligned bounding box of a set of points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteBounds {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl RouteBounds {
    /// Compute the box around `points`
    #[must_use]
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min_latitude: first.latitude(),
            max_latitude: first.latitude(),
            min_longitude: first.longitude(),
            max_longitude: first.longitude(),
        };
        Some(points.iter().skip(1).fold(init, |acc, p| Self {
            min_latitude: acc.min_latitude.min(p.latitude()),
            max_latitude: acc.max_latitude.max(p.latitude()),
            min_longitude: acc.min_longitude.min(p.longitude()),
            max_longitude: acc.max_longitude.max(p.longitude()),
        }))
    }

    /// Midpoint of the box
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        // Averages of in-range values stay in range
        GeoPoint::new_unchecked(
            f64::midpoint(self.min_latitude, self.max_latitude),
            f64::midpoint(self.min_longitude, self.max_longitude),
        )
    }

    /// Region centred on the box with its span scaled by `padding`
    #[must_use]
    pub fn to_region(&self, padding: f64) -> MapRegion {
        MapRegion {
            center: self.center(),
            latitude_delta: (self.max_latitude - self.min_latitude) * padding,
            longitude_delta: (self.max_longitude - self.min_longitude) * padding,
        }
    }
}

/// Visible area handed to a map renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapRegion {
    pub center: GeoPoint,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl MapRegion {
    /// Region framing `path`, or `fallback` when the path has no geometry
    #[must_use]
    pub fn framing(path: &RoutePath, fallback: Self) -> Self {
        path.bounds()
            .map_or(fallback, |b| b.to_region(ROUTE_FRAME_PADDING))
    }
}
