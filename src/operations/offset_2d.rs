//! Curve offsetting by recursive subdivision.
//!
//! A segment whose control polygon turns monotonically and stays below
//! the curvature threshold is "simple" and can be scaled directly along
//! its normal field; anything else is split at the parametric midpoint
//! and offset recursively. Near-circular segments are detected through
//! their focal point and offset as true concentric arcs, which is
//! exact where the edge-offset construction is only approximate.
//!
//! Positive distances offset to the left of the travel direction, so
//! reversing a curve negates the effective offset direction.

use crate::geometry::curve::{Curve, Spline};
use crate::geometry::PatternPoint;
use crate::math::intersect_2d::{line_line_intersection, LineIntersection};
use crate::math::{distance, Point2, TOLERANCE};

/// Bound on the subdivision depth of one offset request.
const RECURSION_LIMIT: u32 = 16;

/// Maximum turn between consecutive hull edges of a "simple" segment.
const SIMPLE_MAX_TURN_DEG: f64 = 30.0;

/// Relative radius spread accepted by the focal-point heuristic.
const FOCAL_RELATIVE_TOLERANCE: f64 = 0.01;

/// Whether a control polygon is safe to offset without subdivision:
/// its edges turn monotonically and each turn stays below the
/// curvature threshold.
#[must_use]
pub fn is_simple(cp: &[Point2; 4]) -> bool {
    let mut dirs: Vec<[f64; 2]> = Vec::new();
    for i in 0..3 {
        let dx = cp[i + 1].x - cp[i].x;
        let dy = cp[i + 1].y - cp[i].y;
        let len = dx.hypot(dy);
        if len > TOLERANCE {
            dirs.push([dx / len, dy / len]);
        }
    }
    if dirs.len() < 2 {
        return true;
    }

    let cos_limit = SIMPLE_MAX_TURN_DEG.to_radians().cos();
    let mut turn_sign = 0.0_f64;
    for pair in dirs.windows(2) {
        let dot = pair[0][0] * pair[1][0] + pair[0][1] * pair[1][1];
        if dot < cos_limit {
            return false;
        }
        let cross = pair[0][0] * pair[1][1] - pair[0][1] * pair[1][0];
        if cross.abs() > 1e-9 {
            if turn_sign != 0.0 && cross.signum() != turn_sign {
                // The hull folds back on itself.
                return false;
            }
            turn_sign = cross.signum();
        }
    }
    true
}

/// Focal point of a near-circular segment: where the normals at both
/// endpoints converge.
///
/// `Some` only when the endpoint radii and the mid-curve radius agree
/// within the relative tolerance, i.e. the segment really is a Bezier
/// rendering of a circular arc.
#[must_use]
pub fn try_find_focal_point(spline: &Spline) -> Option<Point2> {
    let cp = spline.control_points();
    let d0 = spline.derivative_at(0.0);
    let d1 = spline.derivative_at(1.0);
    if d0.x.hypot(d0.y) < TOLERANCE || d1.x.hypot(d1.y) < TOLERANCE {
        return None;
    }

    // Normal lines at both endpoints.
    let n0 = Point2::new(cp[0].x - d0.y, cp[0].y + d0.x);
    let n1 = Point2::new(cp[3].x - d1.y, cp[3].y + d1.x);
    let focal = match line_line_intersection(&cp[0], &n0, &cp[3], &n1) {
        LineIntersection::Bounded(p) | LineIntersection::Unbounded(p) => p,
        LineIntersection::NoIntersection => return None,
    };

    let r_start = distance(&focal, &cp[0]);
    let r_end = distance(&focal, &cp[3]);
    let r_mid = distance(&focal, &spline.point_at(0.5));
    let r = (r_start + r_end) / 2.0;
    if r < TOLERANCE {
        return None;
    }
    let spread = (r_start - r_end).abs().max((r_mid - r).abs());
    if spread <= FOCAL_RELATIVE_TOLERANCE * r {
        Some(focal)
    } else {
        None
    }
}

/// Left unit normal of a direction.
fn left_normal(dir: [f64; 2]) -> [f64; 2] {
    [-dir[1], dir[0]]
}

/// Effective hull edge directions, substituting neighbours (and finally
/// the chord) for degenerate edges. `None` when every control point
/// coincides.
fn edge_directions(cp: &[Point2; 4]) -> Option<[[f64; 2]; 3]> {
    let raw: Vec<Option<[f64; 2]>> = (0..3)
        .map(|i| {
            let dx = cp[i + 1].x - cp[i].x;
            let dy = cp[i + 1].y - cp[i].y;
            let len = dx.hypot(dy);
            (len > TOLERANCE).then(|| [dx / len, dy / len])
        })
        .collect();

    let chord = {
        let dx = cp[3].x - cp[0].x;
        let dy = cp[3].y - cp[0].y;
        let len = dx.hypot(dy);
        (len > TOLERANCE).then(|| [dx / len, dy / len])
    };

    let first = raw[0].or(raw[1]).or(raw[2]).or(chord)?;
    let mid = raw[1].or(chord).unwrap_or(first);
    let last = raw[2].or(raw[1]).or(raw[0]).or(chord).unwrap_or(first);
    Some([first, mid, last])
}

/// Tiller–Hanson edge offsetting with one distance per hull edge.
///
/// Each control polygon edge is moved along its left normal; the inner
/// control points are rebuilt as the intersections of consecutive
/// offset edges, with a midpoint fallback when those are parallel.
fn scale_control_points(cp: &[Point2; 4], d: [f64; 3]) -> [Point2; 4] {
    let Some(dirs) = edge_directions(cp) else {
        return *cp;
    };
    let normals = [
        left_normal(dirs[0]),
        left_normal(dirs[1]),
        left_normal(dirs[2]),
    ];

    let shift = |p: &Point2, n: [f64; 2], dist: f64| {
        Point2::new(p.x + n[0] * dist, p.y + n[1] * dist)
    };
    let along = |p: &Point2, dir: [f64; 2]| Point2::new(p.x + dir[0], p.y + dir[1]);

    let p1 = shift(&cp[0], normals[0], d[0]);
    let p4 = shift(&cp[3], normals[2], d[2]);

    // Offset edge i runs through its shifted anchors with direction dirs[i].
    let corner = |anchor_a: Point2, dir_a: [f64; 2], anchor_b: Point2, dir_b: [f64; 2], img_a: Point2, img_b: Point2| {
        match line_line_intersection(&anchor_a, &along(&anchor_a, dir_a), &anchor_b, &along(&anchor_b, dir_b)) {
            LineIntersection::Bounded(p) | LineIntersection::Unbounded(p) => p,
            LineIntersection::NoIntersection => Point2::new(
                (img_a.x + img_b.x) / 2.0,
                (img_a.y + img_b.y) / 2.0,
            ),
        }
    };

    let p2 = corner(
        shift(&cp[0], normals[0], d[0]),
        dirs[0],
        shift(&cp[1], normals[1], d[1]),
        dirs[1],
        shift(&cp[1], normals[0], d[0]),
        shift(&cp[1], normals[1], d[1]),
    );
    let p3 = corner(
        shift(&cp[1], normals[1], d[1]),
        dirs[1],
        shift(&cp[3], normals[2], d[2]),
        dirs[2],
        shift(&cp[2], normals[1], d[1]),
        shift(&cp[2], normals[2], d[2]),
    );

    [p1, p2, p3, p4]
}

/// Constant-distance scaling of a simple segment along its normal field.
fn scale_normal_mode(cp: &[Point2; 4], d: f64) -> [Point2; 4] {
    scale_control_points(cp, [d, d, d])
}

/// Varying-distance scaling: one distance per hull edge, interpolated
/// between the segment's boundary distances.
fn scale_function_mode(cp: &[Point2; 4], d_start: f64, d_end: f64) -> [Point2; 4] {
    scale_control_points(cp, [d_start, (d_start + d_end) / 2.0, d_end])
}

/// Offsets a near-circular segment as a true concentric arc about its
/// focal point. `None` when the offset would collapse the arc.
fn scale_about_focal_point(spline: &Spline, focal: &Point2, d: f64) -> Option<[Point2; 4]> {
    let cp = spline.control_points();
    let r = distance(focal, &cp[0]);
    if r < TOLERANCE {
        return None;
    }
    let tangent = spline.derivative_at(0.0);
    let cross = tangent.x * (focal.y - cp[0].y) - tangent.y * (focal.x - cp[0].x);
    // Center on the left of travel: a left offset shrinks the radius.
    let new_r = if cross > 0.0 { r - d } else { r + d };
    if new_r <= TOLERANCE {
        return None;
    }
    let ratio = new_r / r;
    Some([
        scale_point(focal, &cp[0], ratio),
        scale_point(focal, &cp[1], ratio),
        scale_point(focal, &cp[2], ratio),
        scale_point(focal, &cp[3], ratio),
    ])
}

fn scale_point(origin: &Point2, p: &Point2, ratio: f64) -> Point2 {
    Point2::new(
        origin.x + (p.x - origin.x) * ratio,
        origin.y + (p.y - origin.y) * ratio,
    )
}

fn spline_from(cp: &[Point2; 4], template: &Spline) -> Spline {
    let mut spline = Spline::from_points(
        PatternPoint::from_point2(&cp[0]),
        &cp[1],
        &cp[2],
        PatternPoint::from_point2(&cp[3]),
    );
    spline
        .meta_mut()
        .set_approximation_scale(template.meta().approximation_scale());
    spline
}

/// Directly offsets one segment by a constant distance.
///
/// Near-circular segments move as concentric arcs; everything else is
/// scaled along its normal field. Accurate only for segments that are
/// already simple — [`offset_spline_path`] handles the general case.
#[must_use]
pub fn offset_spline(spline: &Spline, d: f64) -> Spline {
    if let Some(focal) = try_find_focal_point(spline) {
        if let Some(cp) = scale_about_focal_point(spline, &focal, d) {
            return spline_from(&cp, spline);
        }
    }
    spline_from(&scale_normal_mode(&spline.control_points(), d), spline)
}

/// Offsets a segment by a constant distance, subdividing until every
/// piece is simple. The pieces join end to end.
#[must_use]
pub fn offset_spline_path(spline: &Spline, d: f64) -> Vec<Spline> {
    let mut out = Vec::new();
    offset_curve_r(spline, d, 0, &mut out);
    out
}

fn offset_curve_r(spline: &Spline, d: f64, depth: u32, out: &mut Vec<Spline>) {
    if depth >= RECURSION_LIMIT || is_simple(&spline.control_points()) {
        if depth >= RECURSION_LIMIT {
            log::debug!("offset recursion limit reached; scaling a non-simple segment");
        }
        out.push(offset_spline(spline, d));
        return;
    }
    let (left, right) = spline.split_at(0.5);
    offset_curve_r(&left, d, depth + 1, out);
    offset_curve_r(&right, d, depth + 1, out);
}

/// Directly outlines one segment with a linearly varying distance.
#[must_use]
pub fn outline_spline(spline: &Spline, d_start: f64, d_end: f64) -> Spline {
    spline_from(
        &scale_function_mode(&spline.control_points(), d_start, d_end),
        spline,
    )
}

/// Outlines a segment with a distance varying from `d_start` at the
/// start to `d_end` at the end, subdividing as for
/// [`offset_spline_path`]. The boundary distance of each subdivision is
/// interpolated by arc length.
#[must_use]
pub fn outline_spline_path(spline: &Spline, d_start: f64, d_end: f64) -> Vec<Spline> {
    let mut out = Vec::new();
    outline_curve_r(spline, d_start, d_end, 0, &mut out);
    out
}

fn outline_curve_r(spline: &Spline, d_start: f64, d_end: f64, depth: u32, out: &mut Vec<Spline>) {
    if depth >= RECURSION_LIMIT || is_simple(&spline.control_points()) {
        out.push(outline_spline(spline, d_start, d_end));
        return;
    }
    let (left, right) = spline.split_at(0.5);
    let left_len = left.length();
    let total = left_len + right.length();
    let d_mid = if total > TOLERANCE {
        d_start + (d_end - d_start) * left_len / total
    } else {
        (d_start + d_end) / 2.0
    };
    outline_curve_r(&left, d_start, d_mid, depth + 1, out);
    outline_curve_r(&right, d_mid, d_end, depth + 1, out);
}
