//! Distance and bounds metrics over coordinate paths
//!
//! Coordinates follow the `geo` convention used throughout the crate:
//! `x` is longitude and `y` is latitude, both in WGS84 degrees.

use geo::{Point, Rect};

/// Mean Earth radius in meters used for great-circle distances
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Check that a point satisfies the coordinate range invariant
/// (|latitude| <= 90, |longitude| <= 180)
#[inline(always)]
pub fn is_valid_position(point: &Point<f64>) -> bool {
    point.y().abs() <= 90.0 && point.x().abs() <= 180.0
}

/// Great-circle (haversine) distance between two points in meters
pub fn haversine_distance(a: &Point<f64>, b: &Point<f64>) -> f64 {
    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();
    let delta_lat = (b.y() - a.y()).to_radians();
    let delta_lon = (b.x() - a.x()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Total great-circle length of a path in meters
///
/// Returns 0.0 for paths with fewer than 2 points.
pub fn path_distance(path: &[Point<f64>]) -> f64 {
    path.windows(2)
        .map(|pair| haversine_distance(&pair[0], &pair[1]))
        .sum()
}

/// Minimal axis-aligned bounding box of a path
///
/// Returns `None` for an empty path. Single-point paths yield a degenerate
/// (zero-area) rectangle.
pub fn bounds(path: &[Point<f64>]) -> Option<Rect<f64>> {
    if path.is_empty() {
        return None;
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for point in path {
        min_x = min_x.min(point.x());
        min_y = min_y.min(point.y());
        max_x = max_x.max(point.x());
        max_y = max_y.max(point.y());
    }

    Some(Rect::new(
        geo::Coord { x: min_x, y: min_y },
        geo::Coord { x: max_x, y: max_y },
    ))
}

/// Squared planar distance between two points in degrees²
///
/// Used by the analyzer where relative magnitudes matter more than
/// geodesic accuracy.
#[inline(always)]
pub fn squared_planar_distance(a: &Point<f64>, b: &Point<f64>) -> f64 {
    let dx = a.x() - b.x();
    let dy = a.y() - b.y();
    dx * dx + dy * dy
}

/// Midpoint of two points in planar (degree) space
#[inline(always)]
pub fn midpoint(a: &Point<f64>, b: &Point<f64>) -> Point<f64> {
    Point::new((a.x() + b.x()) / 2.0, (a.y() + b.y()) / 2.0)
}
