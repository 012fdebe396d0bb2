//! Tolerance helpers shared by the stitching and assembly stages

use geo::Coord;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Default endpoint-matching tolerance: 5 m of arc expressed in degrees
pub const DEFAULT_TOLERANCE_DEG: f64 = 5.0 / EARTH_RADIUS_M * (180.0 / std::f64::consts::PI);

/// Default simplification tolerance applied before polygon assembly, in meters
pub const DEFAULT_SIMPLIFY_M: f64 = 5.0;

/// Convert a metric tolerance to degrees of arc at the Earth's surface
///
/// All matching and closure checks operate in the input (lon, lat) coordinate
/// space, so metric tolerances from callers have to be converted once up front.
#[inline]
pub fn degrees_from_meters(meters: f64) -> f64 {
    (meters / EARTH_RADIUS_M).to_degrees()
}

/// Check whether two scalars are within `eps` of each other
#[inline]
pub fn are_close(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() < eps
}

/// Check whether two coordinates coincide within `eps` on both axes
#[inline]
pub fn points_are_close(a: Coord<f64>, b: Coord<f64>, eps: f64) -> bool {
    are_close(a.x, b.x, eps) && are_close(a.y, b.y, eps)
}
