mod arc;
mod elliptical_arc;
mod spline;
mod spline_path;

pub use arc::{Arc, ArcData};
pub use elliptical_arc::EllipticalArc;
pub use spline::Spline;
pub use spline_path::{JointHandles, JointSide, SplinePath};

use crate::error::{GeometryError, Result};
use crate::math::distance_2d::is_point_on_segment;
use crate::math::{
    distance, line_angle_deg, Point2, ACCURACY_POINT_ON_LINE, MIN_CUT_LENGTH, TOLERANCE,
};

use super::{ObjectKind, ObjectMeta};

/// How cut operations treat out-of-range requests.
///
/// `Pedantic` turns a short curve or an out-of-range cut length into a
/// hard error; `Lenient` logs a diagnostic and proceeds with the length
/// clamped to the nearest valid bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutPolicy {
    Pedantic,
    #[default]
    Lenient,
}

/// Render decoration marking the travel direction of a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionArrow {
    /// Where the arrow tip sits on the curve.
    pub tip: Point2,
    /// Tangent direction at the tip, degrees.
    pub angle_deg: f64,
}

/// The contract implemented by every curve variant.
///
/// All operations are read-only and depend only on the curve's own
/// control data plus its approximation scale; the provided methods are
/// derived from the tessellation.
pub trait Curve {
    fn kind(&self) -> ObjectKind;

    fn meta(&self) -> &ObjectMeta;

    fn meta_mut(&mut self) -> &mut ObjectMeta;

    /// Tessellates the curve into a point sequence.
    fn get_points(&self) -> Vec<Point2>;

    /// Curve length in device units. Negative for flipped arcs.
    fn length(&self) -> f64;

    /// Tangent direction at the start of the curve, degrees in `[0, 360)`.
    fn start_angle(&self) -> f64;

    /// Tangent direction at the end of the curve, degrees in `[0, 360)`.
    fn end_angle(&self) -> f64;

    /// First tessellated point, if the curve is non-empty.
    fn first_point(&self) -> Option<Point2> {
        self.get_points().first().copied()
    }

    /// Last tessellated point, if the curve is non-empty.
    fn last_point(&self) -> Option<Point2> {
        self.get_points().last().copied()
    }

    /// Intersections of the curve with the infinite line through
    /// `l1` and `l2`.
    fn intersect_line(&self, l1: &Point2, l2: &Point2) -> Vec<Point2> {
        curve_intersect_line(&self.get_points(), l1, l2)
    }

    /// Whether `point` lies on the curve within the drafting accuracy.
    fn is_point_on_curve(&self, point: &Point2) -> bool {
        let points = self.get_points();
        if points.len() == 1 {
            return distance(&points[0], point) <= ACCURACY_POINT_ON_LINE;
        }
        points
            .windows(2)
            .any(|pair| is_point_on_segment(point, &pair[0], &pair[1], ACCURACY_POINT_ON_LINE))
    }

    /// Arc length travelled from the start of the curve to `point`,
    /// or `None` when the point does not lie on the curve.
    ///
    /// Together with the per-variant cut operations this provides
    /// subdivision at a known point.
    fn length_to_point(&self, point: &Point2) -> Option<f64> {
        let points = self.get_points();
        let mut acc = 0.0;
        for pair in points.windows(2) {
            if is_point_on_segment(point, &pair[0], &pair[1], ACCURACY_POINT_ON_LINE) {
                return Some(acc + distance(&pair[0], point));
            }
            acc += distance(&pair[0], &pair[1]);
        }
        None
    }

    /// Direction arrows decorating the curve for rendering.
    ///
    /// One arrow at the arc-length midpoint, pointed along the local
    /// tangent.
    fn direction_arrows(&self) -> Vec<DirectionArrow> {
        let points = self.get_points();
        if points.len() < 2 {
            return Vec::new();
        }
        let total: f64 = points.windows(2).map(|p| distance(&p[0], &p[1])).sum();
        if total < TOLERANCE {
            return Vec::new();
        }
        let mut remaining = total / 2.0;
        for pair in points.windows(2) {
            let chord = distance(&pair[0], &pair[1]);
            if chord >= remaining && chord > TOLERANCE {
                let f = remaining / chord;
                let tip = Point2::new(
                    pair[0].x + (pair[1].x - pair[0].x) * f,
                    pair[0].y + (pair[1].y - pair[0].y) * f,
                );
                return vec![DirectionArrow {
                    tip,
                    angle_deg: line_angle_deg(&pair[0], &pair[1]),
                }];
            }
            remaining -= chord;
        }
        Vec::new()
    }

    /// Extracts the tessellated points between two points known to lie
    /// on the curve, for building piece boundaries.
    ///
    /// # Errors
    ///
    /// [`crate::error::OperationError::PointNotOnCurve`] when either
    /// boundary cannot be located on the curve within tolerance.
    fn segment_points(&self, begin: &Point2, end: &Point2, reverse: bool) -> Result<Vec<Point2>> {
        crate::operations::segment_points(&self.get_points(), begin, end, reverse)
    }

    /// Axis-aligned bounding box of the tessellation, as min/max corners.
    fn bounding_box(&self) -> Option<(Point2, Point2)> {
        let points = self.get_points();
        let first = points.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some((min, max))
    }

    /// Minimum distance from `point` to the curve.
    fn distance_to_point(&self, point: &Point2) -> f64 {
        crate::math::distance_2d::point_to_polyline_dist(point, &self.get_points())
    }
}

/// Intersections of a tessellated curve with an infinite line.
///
/// Each chord is treated as bounded, the query line as unbounded.
/// Duplicate hits at shared chord endpoints are merged.
#[must_use]
pub fn curve_intersect_line(points: &[Point2], l1: &Point2, l2: &Point2) -> Vec<Point2> {
    let dlx = l2.x - l1.x;
    let dly = l2.y - l1.y;
    if dlx.abs() < TOLERANCE && dly.abs() < TOLERANCE {
        return Vec::new();
    }

    let mut hits: Vec<Point2> = Vec::new();
    for pair in points.windows(2) {
        let dcx = pair[1].x - pair[0].x;
        let dcy = pair[1].y - pair[0].y;
        let cross = dcx * dly - dcy * dlx;
        if cross.abs() < TOLERANCE {
            continue;
        }
        let dx = l1.x - pair[0].x;
        let dy = l1.y - pair[0].y;
        let u = (dx * dly - dy * dlx) / cross;
        if !(-TOLERANCE..=1.0 + TOLERANCE).contains(&u) {
            continue;
        }
        let p = Point2::new(pair[0].x + dcx * u, pair[0].y + dcy * u);
        if !hits
            .iter()
            .any(|q| distance(q, &p) < ACCURACY_POINT_ON_LINE)
        {
            hits.push(p);
        }
    }
    hits
}

/// Validates a requested cut length against the curve's total length.
///
/// Returns the (possibly clamped) length to cut at. The valid interval
/// is `[MIN_CUT_LENGTH, total − MIN_CUT_LENGTH]`; a curve shorter than
/// twice the minimum cannot be cut at all.
///
/// # Errors
///
/// Under [`CutPolicy::Pedantic`], returns [`GeometryError::CurveTooShort`]
/// or [`GeometryError::SegmentLengthOutOfRange`]. Under
/// [`CutPolicy::Lenient`] the same conditions are logged as warnings and
/// the clamped length is returned.
pub fn clamp_cut_length(
    requested: f64,
    total: f64,
    policy: CutPolicy,
    label: &str,
) -> Result<f64> {
    if total <= MIN_CUT_LENGTH * 2.0 {
        match policy {
            CutPolicy::Pedantic => {
                return Err(GeometryError::CurveTooShort {
                    length: total,
                    min: MIN_CUT_LENGTH * 2.0,
                }
                .into());
            }
            CutPolicy::Lenient => {
                log::warn!(
                    "curve '{label}' of length {total} is too short to cut cleanly; \
                     proceeding with a degraded result"
                );
                return Ok(requested.clamp(0.0, total));
            }
        }
    }

    let min = MIN_CUT_LENGTH;
    let max = total - MIN_CUT_LENGTH;
    if requested < min || requested > max {
        let clamped = requested.clamp(min, max);
        match policy {
            CutPolicy::Pedantic => {
                return Err(GeometryError::SegmentLengthOutOfRange {
                    requested,
                    min,
                    max,
                }
                .into());
            }
            CutPolicy::Lenient => {
                log::warn!(
                    "cut length {requested} on '{label}' is outside [{min}, {max}]; \
                     clamped to {clamped}"
                );
                return Ok(clamped);
            }
        }
    }
    Ok(requested)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::HemlineError;

    #[test]
    fn intersect_line_crosses_polyline() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ];
        // Vertical line at x = 5 crosses the first chord only.
        let hits = curve_intersect_line(&points, &Point2::new(5.0, -1.0), &Point2::new(5.0, 1.0));
        assert_eq!(hits.len(), 1, "hits={hits:?}");
        assert!((hits[0].x - 5.0).abs() < 1e-9);
        assert!(hits[0].y.abs() < 1e-9);
    }

    #[test]
    fn intersect_line_is_unbounded_on_the_line_side() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)];
        // A tiny far-away segment still defines the infinite line x = 5.
        let hits = curve_intersect_line(
            &points,
            &Point2::new(5.0, 100.0),
            &Point2::new(5.0, 101.0),
        );
        assert_eq!(hits.len(), 1, "hits={hits:?}");
    }

    #[test]
    fn intersect_line_merges_shared_chord_endpoint() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 5.0),
            Point2::new(10.0, 0.0),
        ];
        // Horizontal line through the apex hits both chords at the same point.
        let hits = curve_intersect_line(&points, &Point2::new(-1.0, 5.0), &Point2::new(1.0, 5.0));
        assert_eq!(hits.len(), 1, "hits={hits:?}");
    }

    #[test]
    fn direction_arrow_sits_mid_curve() {
        let a = Arc::new(
            crate::geometry::PatternPoint::new(0.0, 0.0),
            100.0,
            0.0,
            180.0,
        );
        let arrows = a.direction_arrows();
        assert_eq!(arrows.len(), 1);
        // Midpoint of a CCW half circle is (0, 100), tangent along -X.
        assert!(distance(&arrows[0].tip, &Point2::new(0.0, 100.0)) < 0.5);
        assert!((arrows[0].angle_deg - 180.0).abs() < 3.0);
    }

    #[test]
    fn length_to_point_accumulates_along_curve() {
        let a = Arc::new(
            crate::geometry::PatternPoint::new(0.0, 0.0),
            100.0,
            0.0,
            180.0,
        );
        let p = a.point_at_angle(90.0);
        let len = a.length_to_point(&p).unwrap();
        assert!((len - a.length() / 2.0).abs() < 0.5, "len={len}");
        assert!(a.length_to_point(&Point2::new(500.0, 0.0)).is_none());
    }

    #[test]
    fn bounding_box_covers_the_tessellation() {
        let a = Arc::new(
            crate::geometry::PatternPoint::new(0.0, 0.0),
            100.0,
            0.0,
            90.0,
        );
        let (min, max) = a.bounding_box().unwrap();
        assert!((max.x - 100.0).abs() < 1e-9 && (max.y - 100.0).abs() < 1e-9);
        assert!(min.x.abs() < 1e-9 && min.y.abs() < 1e-9);
    }

    #[test]
    fn clamp_accepts_interior_length() {
        let len = clamp_cut_length(50.0, 100.0, CutPolicy::Pedantic, "c").unwrap();
        assert!((len - 50.0).abs() < 1e-12);
    }

    #[test]
    fn clamp_pedantic_rejects_out_of_range() {
        let err = clamp_cut_length(0.1, 100.0, CutPolicy::Pedantic, "c").unwrap_err();
        assert!(matches!(
            err,
            HemlineError::Geometry(GeometryError::SegmentLengthOutOfRange { .. })
        ));
    }

    #[test]
    fn clamp_lenient_clamps_out_of_range() {
        let len = clamp_cut_length(0.1, 100.0, CutPolicy::Lenient, "c").unwrap();
        assert!((len - MIN_CUT_LENGTH).abs() < 1e-12);
        let len = clamp_cut_length(99.99, 100.0, CutPolicy::Lenient, "c").unwrap();
        assert!((len - (100.0 - MIN_CUT_LENGTH)).abs() < 1e-12);
    }

    #[test]
    fn clamp_pedantic_rejects_short_curve() {
        let err = clamp_cut_length(1.0, MIN_CUT_LENGTH, CutPolicy::Pedantic, "c").unwrap_err();
        assert!(matches!(
            err,
            HemlineError::Geometry(GeometryError::CurveTooShort { .. })
        ));
    }

    #[test]
    fn clamp_lenient_degrades_short_curve() {
        let len = clamp_cut_length(5.0, MIN_CUT_LENGTH, CutPolicy::Lenient, "c").unwrap();
        assert!((len - MIN_CUT_LENGTH).abs() < 1e-12);
    }
}
