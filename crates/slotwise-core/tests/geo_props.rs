// Rust guideline compliant 2026-10-12

//! Property-based tests for the geo module.

use proptest::prelude::*;
use slotwise_core::geo::{bounding_box, distance_km, within_radius};
use slotwise_core::GeoPoint;

fn arb_point() -> impl Strategy<Value = GeoPoint> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(latitude, longitude)| GeoPoint {
        latitude,
        longitude,
    })
}

proptest! {
    /// Distance does not depend on argument order.
    #[test]
    fn prop_distance_symmetric(a in arb_point(), b in arb_point()) {
        prop_assert_eq!(distance_km(&a, &b).unwrap(), distance_km(&b, &a).unwrap());
    }

    /// Repeated calls give bit-identical results.
    #[test]
    fn prop_distance_deterministic(a in arb_point(), b in arb_point()) {
        let first = distance_km(&a, &b).unwrap();
        let second = distance_km(&a, &b).unwrap();
        prop_assert_eq!(first.to_bits(), second.to_bits());
    }

    /// Distances are non-negative and bounded by half the circumference.
    #[test]
    fn prop_distance_bounded(a in arb_point(), b in arb_point()) {
        let d = distance_km(&a, &b).unwrap();
        prop_assert!(d >= 0.0);
        prop_assert!(d <= 20_015.087);
    }

    /// A point at exactly the radius is inside; slightly less radius excludes it.
    #[test]
    fn prop_radius_boundary(a in arb_point(), b in arb_point()) {
        let d = distance_km(&a, &b).unwrap();
        prop_assume!(d > 0.01);
        prop_assert!(within_radius(&a, &b, d).unwrap());
        prop_assert!(!within_radius(&a, &b, d - 0.001).unwrap());
    }

    /// The bounding box always lies within valid coordinate ranges.
    #[test]
    fn prop_bounding_box_clamped(center in arb_point(), radius in 0.1f64..5000.0) {
        let bbox = bounding_box(&center, radius).unwrap();
        prop_assert!(bbox.min_lat >= -90.0 && bbox.max_lat <= 90.0);
        prop_assert!(bbox.min_lon >= -180.0 && bbox.max_lon <= 180.0);
        prop_assert!(bbox.contains(&center));
    }
}
