//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::{GeoPoint, RouteBounds, RouteRequest};
use proptest::prelude::*;

// ============================================================================
// GeoPoint Property Tests
// ============================================================================

mod geo_point_tests {
    use super::*;

    proptest! {
        #[test]
        fn valid_coordinates_create_point(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let point = GeoPoint::new(lat, lon);
            prop_assert!(point.is_ok());

            let point = point.unwrap();
            prop_assert!((point.latitude() - lat).abs() < f64::EPSILON);
            prop_assert!((point.longitude() - lon).abs() < f64::EPSILON);
        }

        #[test]
        fn invalid_latitude_rejected(
            lat in prop_oneof![
                (-1000.0f64..-90.1f64),
                (90.1f64..1000.0f64)
            ],
            lon in -180.0f64..=180.0f64
        ) {
            prop_assert!(GeoPoint::new(lat, lon).is_err());
        }

        #[test]
        fn invalid_longitude_rejected(
            lat in -90.0f64..=90.0f64,
            lon in prop_oneof![
                (-1000.0f64..-180.1f64),
                (180.1f64..1000.0f64)
            ]
        ) {
            prop_assert!(GeoPoint::new(lat, lon).is_err());
        }
    }
}

// ============================================================================
// RouteRequest / RouteBounds Property Tests
// ============================================================================

fn arb_point() -> impl Strategy<Value = GeoPoint> {
    (-90.0f64..=90.0f64, -180.0f64..=180.0f64)
        .prop_map(|(lat, lon)| GeoPoint::new_unchecked(lat, lon))
}

mod route_tests {
    use super::*;

    proptest! {
        #[test]
        fn request_accepts_iff_two_or_more(points in prop::collection::vec(arb_point(), 0..8)) {
            let len = points.len();
            let request = RouteRequest::new(points);
            prop_assert_eq!(request.is_ok(), len >= 2);
        }

        #[test]
        fn bounds_contain_every_point(points in prop::collection::vec(arb_point(), 1..32)) {
            let bounds = RouteBounds::from_points(&points).unwrap();
            for p in &points {
                prop_assert!(p.latitude() >= bounds.min_latitude);
                prop_assert!(p.latitude() <= bounds.max_latitude);
                prop_assert!(p.longitude() >= bounds.min_longitude);
                prop_assert!(p.longitude() <= bounds.max_longitude);
            }
            let center = bounds.center();
            prop_assert!(GeoPoint::new(center.latitude(), center.longitude()).is_ok());
        }
    }
}
