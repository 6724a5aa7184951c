//! Comparative analysis between two coordinate paths
//!
//! All analyses are read-only and deliberately bounded: divergence sampling is
//! capped at ~30 comparisons, intersection scanning sub-samples each polyline
//! to ~50 segments and stops at a hard check cap. On pathological inputs the
//! analyzer returns partial results instead of failing or hanging.

use crate::geometry;
use geo::{Point, Rect};
use smallvec::SmallVec;

/// Upper bound on sampled index comparisons for divergence detection
const MAX_DIVERGENCE_SAMPLES: usize = 30;

/// Floor for the adaptive divergence threshold (degrees²)
const MIN_DIVERGENCE_THRESHOLD: f64 = 1e-5;

/// Upper bound on sub-sampled segments per path for intersection detection
const MAX_SEGMENT_SAMPLES: usize = 50;

/// Hard cap on pairwise segment intersection checks
const MAX_INTERSECTION_CHECKS: usize = 5_000;

/// Determinants below this magnitude are treated as parallel/collinear
const PARALLEL_EPSILON: f64 = 1e-12;

/// Which analyses to run
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisOptions {
    /// Detect points where the paths diverge beyond the adaptive threshold
    pub divergence: bool,
    /// Detect segment crossings between the two paths
    pub intersections: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            divergence: true,
            intersections: true,
        }
    }
}

/// A location where two paths' sampled positions differ beyond the threshold
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DivergencePoint {
    /// Midpoint of the diverging pair
    pub position: Point<f64>,
    /// Planar distance between the paired points in degrees
    pub distance: f64,
    /// Sampled index into both paths
    pub index: usize,
}

/// A proper crossing between one segment of each path
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionPoint {
    /// Location of the crossing
    pub position: Point<f64>,
    /// Index of the crossing segment on the primary path
    pub primary_segment: usize,
    /// Index of the crossing segment on the secondary path
    pub secondary_segment: usize,
}

/// Result of comparing two paths
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisReport {
    /// Divergence points (empty when the analysis is disabled)
    pub divergence_points: Vec<DivergencePoint>,
    /// Intersection points (empty when the analysis is disabled)
    pub intersection_points: Vec<IntersectionPoint>,
    /// Similarity score in 0..=100
    pub similarity_score: f64,
}

/// Compare two paths and produce divergence, intersection and similarity data
pub fn analyze(
    primary: &[Point<f64>],
    secondary: &[Point<f64>],
    options: AnalysisOptions,
) -> AnalysisReport {
    #[cfg(feature = "profiling")]
    profiling::scope!("compare::analyze");

    AnalysisReport {
        divergence_points: if options.divergence {
            divergence_points(primary, secondary)
        } else {
            Vec::new()
        },
        intersection_points: if options.intersections {
            intersection_points(primary, secondary)
        } else {
            Vec::new()
        },
        similarity_score: similarity_score(primary, secondary),
    }
}

/// Indices sampled at a stride keeping the comparison count bounded
fn sampled_indices(len: usize, max_samples: usize) -> SmallVec<[usize; 32]> {
    if len == 0 {
        return SmallVec::new();
    }
    let stride = len.div_ceil(max_samples).max(1);
    (0..len).step_by(stride).collect()
}

/// Detect sampled positions where the paths drift apart
///
/// The threshold adapts to the data's own spread: a fixed cutoff fails across
/// wildly different path scales (city-block vs. continental).
fn divergence_points(primary: &[Point<f64>], secondary: &[Point<f64>]) -> Vec<DivergencePoint> {
    let len = primary.len().min(secondary.len());
    let samples = sampled_indices(len, MAX_DIVERGENCE_SAMPLES);
    if samples.is_empty() {
        return Vec::new();
    }

    let mean_squared: f64 = samples
        .iter()
        .map(|&i| geometry::squared_planar_distance(&primary[i], &secondary[i]))
        .sum::<f64>()
        / samples.len() as f64;
    let threshold = (mean_squared * 0.25).max(MIN_DIVERGENCE_THRESHOLD);

    samples
        .iter()
        .filter_map(|&i| {
            let squared = geometry::squared_planar_distance(&primary[i], &secondary[i]);
            if squared > threshold {
                Some(DivergencePoint {
                    position: geometry::midpoint(&primary[i], &secondary[i]),
                    distance: squared.sqrt(),
                    index: i,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Detect proper crossings between sub-sampled segments of the two polylines
fn intersection_points(
    primary: &[Point<f64>],
    secondary: &[Point<f64>],
) -> Vec<IntersectionPoint> {
    let primary_segments = primary.len().saturating_sub(1);
    let secondary_segments = secondary.len().saturating_sub(1);
    if primary_segments == 0 || secondary_segments == 0 {
        return Vec::new();
    }

    let primary_stride = (primary_segments / MAX_SEGMENT_SAMPLES).max(1);
    let secondary_stride = (secondary_segments / MAX_SEGMENT_SAMPLES).max(1);

    let mut found = Vec::new();
    let mut checks = 0usize;

    for i in (0..primary_segments).step_by(primary_stride) {
        for j in (0..secondary_segments).step_by(secondary_stride) {
            checks += 1;
            if checks > MAX_INTERSECTION_CHECKS {
                tracing::warn!(
                    "Intersection scan stopped at {} checks; returning {} partial results",
                    MAX_INTERSECTION_CHECKS,
                    found.len()
                );
                return found;
            }

            if let Some(position) = segment_intersection(
                &primary[i],
                &primary[i + 1],
                &secondary[j],
                &secondary[j + 1],
            ) {
                found.push(IntersectionPoint {
                    position,
                    primary_segment: i,
                    secondary_segment: j,
                });
            }
        }
    }

    found
}

/// Parametric 2D line-segment intersection
///
/// Solves for t and u via the determinant of the direction vectors; a proper
/// crossing exists iff both parameters lie in [0, 1]. Near-zero determinants
/// (parallel or collinear segments) are excluded.
fn segment_intersection(
    a1: &Point<f64>,
    a2: &Point<f64>,
    b1: &Point<f64>,
    b2: &Point<f64>,
) -> Option<Point<f64>> {
    let dax = a2.x() - a1.x();
    let day = a2.y() - a1.y();
    let dbx = b2.x() - b1.x();
    let dby = b2.y() - b1.y();

    let denom = dax * dby - day * dbx;
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let ox = b1.x() - a1.x();
    let oy = b1.y() - a1.y();
    let t = (ox * dby - oy * dbx) / denom;
    let u = (ox * day - oy * dax) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Point::new(a1.x() + t * dax, a1.y() + t * day))
    } else {
        None
    }
}

/// Weighted similarity score in 0..=100
///
/// Combines the total-distance ratio (0.3), point-count ratio (0.1),
/// bounding-box overlap ratio (0.3) and a sampled shape term (0.3).
/// Either path being empty scores 0.
fn similarity_score(primary: &[Point<f64>], secondary: &[Point<f64>]) -> f64 {
    if primary.is_empty() || secondary.is_empty() {
        return 0.0;
    }

    let distance_a = geometry::path_distance(primary);
    let distance_b = geometry::path_distance(secondary);
    let distance_ratio = ratio(distance_a, distance_b);
    let count_ratio = ratio(primary.len() as f64, secondary.len() as f64);

    let overlap = match (geometry::bounds(primary), geometry::bounds(secondary)) {
        (Some(a), Some(b)) => bounds_overlap_ratio(&a, &b),
        _ => 0.0,
    };
    let shape = shape_similarity(primary, secondary);

    100.0 * (0.3 * distance_ratio + 0.1 * count_ratio + 0.3 * overlap + 0.3 * shape)
}

/// Ratio of the smaller to the larger value; 1.0 when both are zero
fn ratio(a: f64, b: f64) -> f64 {
    let max = a.max(b);
    if max <= 0.0 { 1.0 } else { a.min(b) / max }
}

/// Intersection-over-union of two axis-aligned boxes
///
/// Degenerate (zero-area) boxes fall back to a containment check so that
/// single-point paths still score 1.0 against themselves.
fn bounds_overlap_ratio(a: &Rect<f64>, b: &Rect<f64>) -> f64 {
    let ix = (a.max().x.min(b.max().x) - a.min().x.max(b.min().x)).max(0.0);
    let iy = (a.max().y.min(b.max().y) - a.min().y.max(b.min().y)).max(0.0);

    let intersection = ix * iy;
    let union = a.width() * a.height() + b.width() * b.height() - intersection;

    if union <= 0.0 {
        // Both boxes are degenerate; overlap iff the projections touch
        let touches_x = a.min().x <= b.max().x && b.min().x <= a.max().x;
        let touches_y = a.min().y <= b.max().y && b.min().y <= a.max().y;
        if touches_x && touches_y { 1.0 } else { 0.0 }
    } else {
        intersection / union
    }
}

/// Shape term: mean sampled pair distance normalized by the union diagonal
fn shape_similarity(primary: &[Point<f64>], secondary: &[Point<f64>]) -> f64 {
    let len = primary.len().min(secondary.len());
    let samples = sampled_indices(len, MAX_DIVERGENCE_SAMPLES);
    if samples.is_empty() {
        return 0.0;
    }

    let mean_distance: f64 = samples
        .iter()
        .map(|&i| geometry::squared_planar_distance(&primary[i], &secondary[i]).sqrt())
        .sum::<f64>()
        / samples.len() as f64;

    let combined: Vec<Point<f64>> = primary.iter().chain(secondary.iter()).copied().collect();
    let diagonal = geometry::bounds(&combined)
        .map(|rect| (rect.width().powi(2) + rect.height().powi(2)).sqrt())
        .unwrap_or(0.0);

    if diagonal <= 0.0 {
        // All points coincide
        return 1.0;
    }

    (1.0 - mean_distance / diagonal).clamp(0.0, 1.0)
}

/// Request to recompute combined bounds for aligning two paths
///
/// Geometry only: the actual viewport fitting is a host concern.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AutoAlignRequest {
    /// Padding in degrees applied to every side of the combined bounds
    pub threshold: f64,
}

/// Combined bounds of both paths, padded by the request threshold
///
/// Returns `None` when both paths are empty.
pub fn auto_align(
    primary: &[Point<f64>],
    secondary: &[Point<f64>],
    request: AutoAlignRequest,
) -> Option<Rect<f64>> {
    let combined: Vec<Point<f64>> = primary.iter().chain(secondary.iter()).copied().collect();
    let rect = geometry::bounds(&combined)?;
    let pad = request.threshold.max(0.0);
    Some(Rect::new(
        geo::Coord {
            x: rect.min().x - pad,
            y: rect.min().y - pad,
        },
        geo::Coord {
            x: rect.max().x + pad,
            y: rect.max().y + pad,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag_path(points: usize, base_lon: f64, base_lat: f64) -> Vec<Point<f64>> {
        (0..points)
            .map(|i| {
                let t = i as f64 / points as f64;
                Point::new(
                    base_lon + t + (t * 30.0).cos() * 0.01,
                    base_lat + t + (t * 50.0).sin() * 0.01,
                )
            })
            .collect()
    }

    #[test]
    fn test_identical_paths_have_no_divergence() {
        let path = zigzag_path(40, -0.1, 51.5);
        let report = analyze(&path, &path, AnalysisOptions::default());
        assert!(report.divergence_points.is_empty());
    }

    #[test]
    fn test_identical_paths_score_100() {
        let path = zigzag_path(40, -0.1, 51.5);
        let report = analyze(&path, &path, AnalysisOptions::default());
        assert!((report.similarity_score - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_divergent_tail_is_detected() {
        let primary = zigzag_path(40, 0.0, 0.0);
        let mut secondary = primary.clone();
        // Push the second half of the path far away
        for point in secondary.iter_mut().skip(20) {
            *point = Point::new(point.x() + 1.0, point.y() + 1.0);
        }
        let report = analyze(&primary, &secondary, AnalysisOptions::default());
        assert!(!report.divergence_points.is_empty());
        assert!(report.divergence_points.iter().all(|d| d.index >= 20));
        for d in &report.divergence_points {
            assert!((d.distance - std::f64::consts::SQRT_2).abs() < 1e-9);
        }
    }

    #[test]
    fn test_x_crossing_yields_one_intersection() {
        let primary = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        let secondary = vec![Point::new(0.0, 1.0), Point::new(1.0, 0.0)];
        let report = analyze(&primary, &secondary, AnalysisOptions::default());

        assert_eq!(report.intersection_points.len(), 1);
        let hit = &report.intersection_points[0];
        assert!((hit.position.x() - 0.5).abs() < 1e-12);
        assert!((hit.position.y() - 0.5).abs() < 1e-12);
        assert_eq!(hit.primary_segment, 0);
        assert_eq!(hit.secondary_segment, 0);
    }

    #[test]
    fn test_parallel_segments_do_not_intersect() {
        let primary = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        let secondary = vec![Point::new(0.0, 1.0), Point::new(1.0, 1.0)];
        let report = analyze(&primary, &secondary, AnalysisOptions::default());
        assert!(report.intersection_points.is_empty());
    }

    #[test]
    fn test_options_disable_analyses() {
        let primary = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        let secondary = vec![Point::new(0.0, 1.0), Point::new(1.0, 0.0)];
        let report = analyze(
            &primary,
            &secondary,
            AnalysisOptions {
                divergence: false,
                intersections: false,
            },
        );
        assert!(report.divergence_points.is_empty());
        assert!(report.intersection_points.is_empty());
    }

    #[test]
    fn test_long_paths_stay_bounded() {
        // Two dense zigzags crossing repeatedly; the scan must cap, not hang
        let primary = zigzag_path(20_000, 0.0, 0.0);
        let secondary: Vec<Point<f64>> = zigzag_path(20_000, 0.0, 1.0)
            .into_iter()
            .map(|p| Point::new(p.x(), 1.0 - p.y()))
            .collect();
        let report = analyze(&primary, &secondary, AnalysisOptions::default());
        // Sub-sampling keeps the pair count at ~50x50 which is under the cap;
        // the important property is termination with a sane result
        assert!(report.similarity_score >= 0.0 && report.similarity_score <= 100.0);
    }

    #[test]
    fn test_empty_paths_degrade() {
        let report = analyze(&[], &[], AnalysisOptions::default());
        assert!(report.divergence_points.is_empty());
        assert!(report.intersection_points.is_empty());
        assert_eq!(report.similarity_score, 0.0);
    }

    #[test]
    fn test_auto_align_pads_combined_bounds() {
        let primary = vec![Point::new(0.0, 0.0)];
        let secondary = vec![Point::new(2.0, 3.0)];
        let rect = auto_align(&primary, &secondary, AutoAlignRequest { threshold: 0.5 }).unwrap();
        assert_eq!(rect.min().x, -0.5);
        assert_eq!(rect.min().y, -0.5);
        assert_eq!(rect.max().x, 2.5);
        assert_eq!(rect.max().y, 3.5);

        assert!(auto_align(&[], &[], AutoAlignRequest { threshold: 1.0 }).is_none());
    }
}
