//! Geographic point value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A WGS84 coordinate pair
///
/// Construction through [`GeoPoint::new`] guarantees a finite latitude in
/// [-90, 90] and a finite longitude in [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    /// Latitude in degrees
    latitude: f64,
    /// Longitude in degrees
    longitude: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = DomainError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl GeoPoint {
    /// Create a new point with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if either value is out of
    /// range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        // NaN fails `contains`, so this also covers non-finite input
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a point without validation, for compile-time constants
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Whether two points are equal within `tolerance` degrees on both axes
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.latitude - other.latitude).abs() <= tolerance
            && (self.longitude - other.longitude).abs() <= tolerance
    }

    /// Paris, France
    #[must_use]
    pub const fn paris() -> Self {
        Self::new_unchecked(48.8566, 2.3522)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinates() {
        let point = GeoPoint::new(45.764, 4.8357).expect("valid coordinates");
        assert!((point.latitude() - 45.764).abs() < f64::EPSILON);
        assert!((point.longitude() - 4.8357).abs() < f64::EPSILON);
    }

    #[test]
    fn test_boundary_coordinates() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
        assert!(GeoPoint::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(-91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, 181.0).is_err());
        assert!(GeoPoint::new(0.0, -181.0).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
        assert!(GeoPoint::new(f64::NEG_INFINITY, 0.0).is_err());
    }

    #[test]
    fn test_display() {
        let point = GeoPoint::paris();
        assert_eq!(point.to_string(), "48.856600, 2.352200");
    }

    #[test]
    fn test_approx_eq() {
        let a = GeoPoint::new(48.85660, 2.35220).unwrap();
        let b = GeoPoint::new(48.85661, 2.35219).unwrap();
        assert!(a.approx_eq(&b, 1e-4));
        assert!(!a.approx_eq(&b, 1e-6));
    }

    #[test]
    fn test_serialization() {
        let point = GeoPoint::paris();
        let json = serde_json::to_string(&point).expect("serialize");
        let deserialized: GeoPoint = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(point, deserialized);
    }

    #[test]
    fn test_deserialization_validates() {
        let json = r#"{"latitude": 120.0, "longitude": 2.0}"#;
        assert!(serde_json::from_str::<GeoPoint>(json).is_err());
    }
}
