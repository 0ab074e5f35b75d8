//! Property-based tests for the geofence evaluator.
//!
//! These tests verify:
//! - Haversine distance is a well-behaved metric on valid coordinates
//! - The radius check is inclusive at the boundary
//! - Exit detection fires exactly on inside → outside transitions

use std::f64::consts::PI;

use proptest::prelude::*;
use safetrail_core::geofence::{
    distance_meters, evaluate, is_inside, Coordinate, Geofence, EARTH_RADIUS_METERS,
};

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-90.0f64..=90.0, -180.0f64..=180.0)
        .prop_map(|(lat, lon)| Coordinate::new(lat, lon).expect("in range"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Property: distance is finite, non-negative, and at most half the
    /// Earth's circumference.
    #[test]
    fn distance_is_bounded(a in coordinate(), b in coordinate()) {
        let d = distance_meters(a, b);
        prop_assert!(d.is_finite());
        prop_assert!(d >= 0.0);
        prop_assert!(d <= PI * EARTH_RADIUS_METERS + 1e-6);
    }

    /// Property: distance does not depend on argument order.
    #[test]
    fn distance_is_symmetric(a in coordinate(), b in coordinate()) {
        let ab = distance_meters(a, b);
        let ba = distance_meters(b, a);
        prop_assert!((ab - ba).abs() < 1e-6, "{ab} vs {ba}");
    }

    /// Property: a point is zero meters from itself.
    #[test]
    fn distance_to_self_is_zero(a in coordinate()) {
        prop_assert_eq!(distance_meters(a, a), 0.0);
    }

    /// Property: going via a third point is never shorter.
    #[test]
    fn distance_obeys_triangle_inequality(
        a in coordinate(),
        b in coordinate(),
        c in coordinate(),
    ) {
        let direct = distance_meters(a, c);
        let via = distance_meters(a, b) + distance_meters(b, c);
        prop_assert!(direct <= via + 1.0, "{direct} > {via}");
    }

    /// Property: a point exactly on the boundary is inside.
    #[test]
    fn boundary_is_inside(center in coordinate(), point in coordinate()) {
        let radius = distance_meters(point, center);
        let fence = Geofence::new(center, radius).expect("valid radius");
        prop_assert!(is_inside(point, &fence));
    }

    /// Property: evaluation agrees with the radius check and only reports a
    /// crossing for inside → outside.
    #[test]
    fn evaluation_matches_definition(
        center in coordinate(),
        point in coordinate(),
        radius in 0.0f64..5_000_000.0,
        was_inside in any::<bool>(),
    ) {
        let fence = Geofence::new(center, radius).expect("valid radius");
        let result = evaluate(point, &fence, was_inside);

        prop_assert_eq!(result.inside, distance_meters(point, center) <= radius);
        prop_assert_eq!(result.crossed_out, was_inside && !result.inside);
        prop_assert_eq!(result.distance_meters, distance_meters(point, center));
    }

    /// Property: out-of-range latitudes never construct a coordinate.
    #[test]
    fn out_of_range_latitude_rejected(
        lat in prop_oneof![90.000_001f64..1_000.0, -1_000.0f64..-90.000_001],
        lon in -180.0f64..=180.0,
    ) {
        prop_assert!(Coordinate::new(lat, lon).is_err());
    }
}

/// Non-finite input is rejected rather than evaluated.
#[test]
fn non_finite_coordinates_rejected() {
    for (lat, lon) in [
        (f64::NAN, 0.0),
        (0.0, f64::NAN),
        (f64::INFINITY, 0.0),
        (0.0, f64::NEG_INFINITY),
    ] {
        assert!(Coordinate::new(lat, lon).is_err(), "{lat}, {lon}");
    }
}
