//! Point/segment distance predicates with tolerance envelopes.
//!
//! Curve hit-testing treats a segment as a capsule ("cigar") of
//! half-width `accuracy` rather than a zero-width line, so floating
//! point noise near the segment or its endpoints never flips a test.

use super::{distance, distance_sq, Point2, TOLERANCE};

/// Minimum distance from `p` to the segment `a → b`.
///
/// A degenerate (zero-length) segment degrades to point distance.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    if len_sq < TOLERANCE * TOLERANCE {
        return distance(p, a);
    }

    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);
    let closest = Point2::new(a.x + t * dx, a.y + t * dy);
    distance(p, &closest)
}

/// Capsule membership test: is `t` within `accuracy` of the segment `p1 → p2`?
///
/// True for points within `accuracy` of either endpoint even when the
/// segment itself is degenerate (`p1 ≈ p2`).
#[must_use]
pub fn is_point_on_segment(t: &Point2, p1: &Point2, p2: &Point2, accuracy: f64) -> bool {
    if distance_sq(t, p1) <= accuracy * accuracy || distance_sq(t, p2) <= accuracy * accuracy {
        return true;
    }
    point_to_segment_dist(t, p1, p2) <= accuracy
}

/// Sign-free perpendicular-dot-product test against the infinite line
/// through `p1` and `p2`.
///
/// The epsilon is scaled by the segment length so the effective
/// tolerance is a perpendicular distance of `accuracy`, consistent
/// regardless of how long the defining segment is.
#[must_use]
pub fn is_point_on_line_perp_dot(t: &Point2, p1: &Point2, p2: &Point2, accuracy: f64) -> bool {
    let len = distance(p1, p2);
    if len < TOLERANCE {
        return distance(t, p1) <= accuracy;
    }
    let pdp = (p2.x - p1.x) * (t.y - p1.y) - (p2.y - p1.y) * (t.x - p1.x);
    pdp.abs() <= accuracy * len
}

/// Projection of `point` onto the infinite line through `p1` and `p2`.
///
/// Computed as the exact intersection of the line with the perpendicular
/// through `point`. Falls back to returning `point` unchanged when the
/// defining segment is degenerate and no intersection exists.
#[must_use]
pub fn closest_point(p1: &Point2, p2: &Point2, point: &Point2) -> Point2 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < TOLERANCE * TOLERANCE {
        return *point;
    }
    let t = ((point.x - p1.x) * dx + (point.y - p1.y) * dy) / len_sq;
    Point2::new(p1.x + t * dx, p1.y + t * dy)
}

/// Minimum distance from `p` to a polyline.
///
/// Returns `f64::MAX` for a polyline with fewer than two points.
#[must_use]
pub fn point_to_polyline_dist(p: &Point2, points: &[Point2]) -> f64 {
    if points.len() < 2 {
        return points.first().map_or(f64::MAX, |only| distance(p, only));
    }
    let mut best = f64::MAX;
    for pair in points.windows(2) {
        best = best.min(point_to_segment_dist(p, &pair[0], &pair[1]));
    }
    best
}
