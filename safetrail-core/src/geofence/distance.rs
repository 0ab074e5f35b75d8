//! Great-circle distance and geofence membership.
//!
//! Distances use the haversine formula on a spherical Earth. The spherical
//! model is off by up to ~0.5% against the WGS-84 ellipsoid, which is far
//! below GPS noise at geofence scales.

use super::types::{Coordinate, Evaluation, Geofence};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Computes the great-circle distance between two coordinates in meters.
///
/// The result is never negative, never NaN, and never exceeds half the
/// circumference (`π · R`).
///
/// # Examples
///
/// ```
/// use safetrail_core::geofence::{distance_meters, Coordinate};
///
/// let a = Coordinate::new(40.7128, -74.0060).unwrap();
/// let b = Coordinate::new(40.7228, -74.0060).unwrap();
///
/// assert_eq!(distance_meters(a, a), 0.0);
/// let d = distance_meters(a, b);
/// assert!((d - 1_112.0).abs() < 1.0);
/// ```
#[must_use]
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude().to_radians();
    let phi2 = b.latitude().to_radians();
    let delta_phi = (b.latitude() - a.latitude()).to_radians();
    let delta_lambda = (b.longitude() - a.longitude()).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for near-antipodal points.
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Returns whether `current` lies within `fence`. The boundary is inclusive.
///
/// # Examples
///
/// ```
/// use safetrail_core::geofence::{is_inside, Coordinate, Geofence};
///
/// let center = Coordinate::new(40.7128, -74.0060).unwrap();
/// let fence = Geofence::new(center, 1_000.0).unwrap();
///
/// assert!(is_inside(center, &fence));
/// assert!(!is_inside(Coordinate::new(40.7228, -74.0060).unwrap(), &fence));
/// ```
#[must_use]
pub fn is_inside(current: Coordinate, fence: &Geofence) -> bool {
    distance_meters(current, fence.center()) <= fence.radius_meters()
}

/// Evaluates a coordinate against a fence given the previous membership.
///
/// `inside` depends only on `current` and `fence`. `crossed_out` is true
/// only for an inside to outside transition; staying outside or re-entering
/// never sets it.
///
/// # Examples
///
/// ```
/// use safetrail_core::geofence::{evaluate, Coordinate, Geofence};
///
/// let center = Coordinate::new(40.7128, -74.0060).unwrap();
/// let fence = Geofence::new(center, 1_000.0).unwrap();
/// let north = Coordinate::new(40.7228, -74.0060).unwrap();
///
/// let eval = evaluate(north, &fence, true);
/// assert!(!eval.inside);
/// assert!(eval.crossed_out);
///
/// let again = evaluate(north, &fence, false);
/// assert!(!again.crossed_out);
/// ```
#[must_use]
pub fn evaluate(current: Coordinate, fence: &Geofence, was_inside: bool) -> Evaluation {
    let distance = distance_meters(current, fence.center());
    let inside = distance <= fence.radius_meters();

    Evaluation {
        inside,
        crossed_out: was_inside && !inside,
        distance_meters: distance,
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn nyc_fence() -> Geofence {
        Geofence::new(coord(40.7128, -74.0060), 1_000.0).unwrap()
    }

    #[test]
    fn identical_coordinates_have_zero_distance() {
        let a = coord(40.7128, -74.0060);
        assert_eq!(distance_meters(a, a), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = coord(48.8584, 2.2945);
        let b = coord(41.8902, 12.4922);
        assert!((distance_meters(a, b) - distance_meters(b, a)).abs() < 1e-6);
    }

    #[test]
    fn paris_to_rome_is_about_1100_km() {
        let eiffel = coord(48.8584, 2.2945);
        let colosseum = coord(41.8902, 12.4922);
        let d = distance_meters(eiffel, colosseum);
        assert!((1_100_000.0..1_120_000.0).contains(&d), "got {d}");
    }

    #[test]
    fn antipodal_points_do_not_exceed_half_circumference() {
        let d = distance_meters(coord(0.0, 0.0), coord(0.0, 180.0));
        assert!(d <= PI * EARTH_RADIUS_METERS);
        assert!((d - PI * EARTH_RADIUS_METERS).abs() < 1.0);

        let poles = distance_meters(coord(90.0, 0.0), coord(-90.0, 0.0));
        assert!(poles <= PI * EARTH_RADIUS_METERS);
    }

    #[test]
    fn distance_grows_with_separation() {
        let origin = coord(10.0, 10.0);
        let near = distance_meters(origin, coord(10.01, 10.0));
        let mid = distance_meters(origin, coord(10.1, 10.0));
        let far = distance_meters(origin, coord(11.0, 10.0));
        assert!(near < mid);
        assert!(mid < far);
    }

    #[test]
    fn center_is_inside_without_crossing() {
        let fence = nyc_fence();
        let eval = evaluate(fence.center(), &fence, true);
        assert_eq!(eval.distance_meters, 0.0);
        assert!(eval.inside);
        assert!(!eval.crossed_out);
    }

    #[test]
    fn leaving_the_fence_crosses_out() {
        let fence = nyc_fence();
        let north = coord(40.7228, -74.0060);
        let eval = evaluate(north, &fence, true);

        assert!((1_100.0..1_125.0).contains(&eval.distance_meters));
        assert!(!eval.inside);
        assert!(eval.crossed_out);
    }

    #[test]
    fn staying_outside_does_not_cross_again() {
        let fence = nyc_fence();
        let eval = evaluate(coord(40.7228, -74.0060), &fence, false);
        assert!(!eval.inside);
        assert!(!eval.crossed_out);
    }

    #[test]
    fn re_entry_is_not_alarmed() {
        let fence = nyc_fence();
        let eval = evaluate(fence.center(), &fence, false);
        assert!(eval.inside);
        assert!(!eval.crossed_out);
    }

    #[test]
    fn boundary_is_inclusive() {
        let center = coord(40.7128, -74.0060);
        let edge = coord(40.7200, -74.0010);
        let radius = distance_meters(center, edge);
        let fence = Geofence::new(center, radius).unwrap();

        assert!(is_inside(edge, &fence));
        assert!(evaluate(edge, &fence, true).inside);
    }

    #[test]
    fn zero_radius_fence_contains_only_center() {
        let center = coord(1.0, 1.0);
        let fence = Geofence::new(center, 0.0).unwrap();
        assert!(is_inside(center, &fence));
        assert!(!is_inside(coord(1.0, 1.000_01), &fence));
    }

    #[test]
    fn membership_ignores_previous_state() {
        let fence = nyc_fence();
        let north = coord(40.7228, -74.0060);
        assert_eq!(
            evaluate(north, &fence, true).inside,
            evaluate(north, &fence, false).inside
        );
    }
}
