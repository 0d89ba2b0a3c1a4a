//! # Geodesic calculator
//!
//! Pure functions converting a pair of geographic positions into the azimuth
//! and elevation at which the second position is seen from the first, on a
//! spherical earth.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use util::maths::{clamp, wrap_360};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Mean radius of the earth.
///
/// Units: meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A geographic position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    /// Latitude, positive north.
    ///
    /// Units: degrees
    pub lat_deg: f64,

    /// Longitude, positive east.
    ///
    /// Units: degrees
    pub lon_deg: f64,

    /// Altitude.
    ///
    /// Units: meters
    pub alt_m: f64,
}

/// Where a target is as seen from an observer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LookAngles {
    /// Forward azimuth from the observer to the target in `[0, 360)`, 0 is
    /// north and 90 is east.
    ///
    /// Units: degrees
    pub azimuth_deg: f64,

    /// Great circle distance along the ground between observer and target.
    ///
    /// Units: meters
    pub horizontal_dist_m: f64,

    /// Elevation above the observer's horizon in `[-90, 90]`, 90 is zenith.
    ///
    /// Units: degrees
    pub elevation_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GeoPosition {
    pub fn new(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Self {
        Self {
            lat_deg,
            lon_deg,
            alt_m
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Compute the initial bearing of the great circle path from point 1 to point
/// 2.
///
/// The result is in `[0, 360)` degrees. Identical points give a bearing of 0.
pub fn compute_bearing(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let lat1 = lat1_deg.to_radians();
    let lat2 = lat2_deg.to_radians();
    let d_lon = (lon2_deg - lon1_deg).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    wrap_360(y.atan2(x).to_degrees())
}

/// Compute the great circle distance between two positions using the
/// haversine formula. Altitude is ignored.
///
/// Units: meters
pub fn horizontal_distance_m(from: &GeoPosition, to: &GeoPosition) -> f64 {
    let d_lat = (to.lat_deg - from.lat_deg).to_radians();
    let d_lon = (to.lon_deg - from.lon_deg).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat_deg.to_radians().cos()
        * to.lat_deg.to_radians().cos()
        * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `a` just outside [0, 1] for (anti)podal points
    let a = clamp(&a, &0.0, &1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Compute the azimuth and elevation of `target` as seen from `observer`.
///
/// Returns `(azimuth_deg, elevation_deg)`. The elevation is clamped to
/// `[-90, 90]`. When the target is directly above or below the observer the
/// azimuth is meaningless but still a finite value in range.
pub fn compute_elevation(observer: &GeoPosition, target: &GeoPosition) -> (f64, f64) {
    let look = compute_look_angles(observer, target);

    (look.azimuth_deg, look.elevation_deg)
}

/// Compute the full set of look angles from `observer` to `target`.
pub fn compute_look_angles(observer: &GeoPosition, target: &GeoPosition) -> LookAngles {
    let azimuth_deg = compute_bearing(
        observer.lat_deg, 
        observer.lon_deg, 
        target.lat_deg, 
        target.lon_deg
    );

    let horizontal_dist_m = horizontal_distance_m(observer, target);
    let height_diff_m = target.alt_m - observer.alt_m;

    let elevation_deg = clamp(
        &height_diff_m.atan2(horizontal_dist_m).to_degrees(),
        &-90.0,
        &90.0
    );

    LookAngles {
        azimuth_deg,
        horizontal_dist_m,
        elevation_deg
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_bearing_cardinal() {
        assert!((compute_bearing(0.0, 0.0, 0.0, 90.0) - 90.0).abs() < TOL);
        assert!((compute_bearing(0.0, 0.0, 90.0, 0.0) - 0.0).abs() < TOL);
        assert!((compute_bearing(0.0, 0.0, -10.0, 0.0) - 180.0).abs() < TOL);
        assert!((compute_bearing(0.0, 0.0, 0.0, -10.0) - 270.0).abs() < TOL);
    }

    #[test]
    fn test_bearing_range() {
        let points = [
            (51.5, -0.12), (-33.9, 151.2), (40.7, -74.0), (0.0, 179.9), (0.0, -179.9),
            (89.9, 0.0), (-89.9, 45.0)
        ];

        for a in points.iter() {
            for b in points.iter() {
                let brg = compute_bearing(a.0, a.1, b.0, b.1);
                assert!(brg.is_finite());
                assert!(brg >= 0.0 && brg < 360.0, "{:?} -> {:?} = {}", a, b, brg);
            }
        }
    }

    #[test]
    fn test_bearing_identical_points() {
        let brg = compute_bearing(52.0, 1.0, 52.0, 1.0);
        assert!(brg.is_finite());
        assert!(brg >= 0.0 && brg < 360.0);
    }

    #[test]
    fn test_horizontal_distance() {
        // One degree of longitude on the equator
        let d = horizontal_distance_m(
            &GeoPosition::new(0.0, 0.0, 0.0), 
            &GeoPosition::new(0.0, 1.0, 0.0)
        );
        let expected = EARTH_RADIUS_M * 1f64.to_radians();
        assert!((d - expected).abs() < 1e-6);

        // Antipodal points are half the circumference apart
        let d = horizontal_distance_m(
            &GeoPosition::new(0.0, 0.0, 0.0), 
            &GeoPosition::new(0.0, 180.0, 0.0)
        );
        assert!((d - EARTH_RADIUS_M * std::f64::consts::PI).abs() < 1e-3);
    }

    #[test]
    fn test_elevation_directly_above() {
        let (az, el) = compute_elevation(
            &GeoPosition::new(0.0, 0.0, 0.0), 
            &GeoPosition::new(0.0, 0.0, 100.0)
        );
        assert!(az.is_finite());
        assert!((el - 90.0).abs() < TOL);

        let (_, el) = compute_elevation(
            &GeoPosition::new(0.0, 0.0, 100.0), 
            &GeoPosition::new(0.0, 0.0, 0.0)
        );
        assert!((el + 90.0).abs() < TOL);
    }

    #[test]
    fn test_elevation_same_position() {
        let pos = GeoPosition::new(51.0, -1.0, 20.0);
        let (az, el) = compute_elevation(&pos, &pos);
        assert!(az.is_finite());
        assert_eq!(el, 0.0);
    }

    #[test]
    fn test_elevation_45_deg() {
        // Target 1 km north and 1 km up, to within the small curvature error
        // of the haversine distance.
        let north_deg = (1000.0 / EARTH_RADIUS_M).to_degrees();
        let look = compute_look_angles(
            &GeoPosition::new(0.0, 0.0, 0.0), 
            &GeoPosition::new(north_deg, 0.0, 1000.0)
        );
        assert!(look.azimuth_deg.abs() < TOL);
        assert!((look.horizontal_dist_m - 1000.0).abs() < 1e-6);
        assert!((look.elevation_deg - 45.0).abs() < 1e-6);
    }
}
