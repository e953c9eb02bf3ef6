//! 2D intersection primitives shared by every curve variant.

use super::distance_2d::closest_point;
use super::{distance, fuzzy_equal, Point2, TOLERANCE};

/// Classification of a line/line intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineIntersection {
    /// The lines are parallel and distinct.
    NoIntersection,
    /// The intersection lies within both segments.
    Bounded(Point2),
    /// The infinite lines intersect outside at least one segment.
    Unbounded(Point2),
}

/// Result of intersecting two circles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CircleIntersection {
    /// The circles do not meet.
    NoIntersection,
    /// The circles touch at a single point.
    Touching(Point2),
    /// The circles cross at two points.
    Crossing(Point2, Point2),
    /// Same center and radius within tolerance; every point is shared.
    Coincident,
}

impl CircleIntersection {
    /// Number of discrete intersection points, with `3` standing in for
    /// the coincident case, matching the discriminant callers branch on.
    #[must_use]
    pub fn discriminant(&self) -> u8 {
        match self {
            Self::NoIntersection => 0,
            Self::Touching(_) => 1,
            Self::Crossing(_, _) => 2,
            Self::Coincident => 3,
        }
    }
}

/// Intersection of the infinite lines through `a0 → a1` and `b0 → b1`,
/// classified against both segments' bounds.
#[must_use]
pub fn line_line_intersection(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> LineIntersection {
    let da = (a1.x - a0.x, a1.y - a0.y);
    let db = (b1.x - b0.x, b1.y - b0.y);

    let cross = da.0 * db.1 - da.1 * db.0;
    if cross.abs() < TOLERANCE {
        return LineIntersection::NoIntersection;
    }

    let dx = b0.x - a0.x;
    let dy = b0.y - a0.y;
    let t = (dx * db.1 - dy * db.0) / cross;
    let u = (dx * da.1 - dy * da.0) / cross;

    let point = Point2::new(a0.x + da.0 * t, a0.y + da.1 * t);
    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        LineIntersection::Bounded(point)
    } else {
        LineIntersection::Unbounded(point)
    }
}

/// Intersection point of two lines, with a parallelism re-check.
///
/// The generic classification can report an unbounded intersection for
/// segments that are parallel up to floating-point noise. A manual
/// cross-product check on the normalized directions (tolerance `1e-6`)
/// demotes such a result to "no intersection".
#[must_use]
pub fn lines_intersect(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> Option<Point2> {
    match line_line_intersection(a0, a1, b0, b1) {
        LineIntersection::NoIntersection => None,
        LineIntersection::Bounded(p) => Some(p),
        LineIntersection::Unbounded(p) => {
            let la = distance(a0, a1);
            let lb = distance(b0, b1);
            if la < TOLERANCE || lb < TOLERANCE {
                return None;
            }
            let na = ((a1.x - a0.x) / la, (a1.y - a0.y) / la);
            let nb = ((b1.x - b0.x) / lb, (b1.y - b0.y) / lb);
            let cross = na.0 * nb.1 - na.1 * nb.0;
            if cross.abs() < 1e-6 {
                None
            } else {
                Some(p)
            }
        }
    }
}

/// Intersections of the infinite line through `p1 → p2` with a circle.
///
/// Projects the center onto the line and derives 0, 1 or 2 solutions
/// algebraically; the tangent case is decided by fuzzy comparison of
/// the center distance against the radius. A degenerate zero-length
/// segment yields no intersections.
#[must_use]
pub fn line_intersect_circle(center: &Point2, radius: f64, p1: &Point2, p2: &Point2) -> Vec<Point2> {
    let len = distance(p1, p2);
    if len < TOLERANCE {
        return Vec::new();
    }

    let foot = closest_point(p1, p2, center);
    let d = distance(center, &foot);

    if fuzzy_equal(d, radius) {
        return vec![foot];
    }
    if d > radius {
        return Vec::new();
    }

    let half_chord = (radius * radius - d * d).sqrt();
    let dir = ((p2.x - p1.x) / len, (p2.y - p1.y) / len);
    vec![
        Point2::new(foot.x - half_chord * dir.0, foot.y - half_chord * dir.1),
        Point2::new(foot.x + half_chord * dir.0, foot.y + half_chord * dir.1),
    ]
}

/// Closed-form intersection of two circles.
///
/// Identical circles (same center and radius within tolerance) are
/// reported as [`CircleIntersection::Coincident`], distinct from both
/// "no intersection" and the tangent case.
#[must_use]
pub fn intersect_circles(c1: &Point2, r1: f64, c2: &Point2, r2: f64) -> CircleIntersection {
    let d = distance(c1, c2);

    if d < TOLERANCE && fuzzy_equal(r1, r2) {
        return CircleIntersection::Coincident;
    }
    if d < TOLERANCE {
        // Concentric with different radii.
        return CircleIntersection::NoIntersection;
    }

    let sum = r1 + r2;
    let diff = (r1 - r2).abs();
    if d > sum + TOLERANCE || d < diff - TOLERANCE {
        return CircleIntersection::NoIntersection;
    }

    // Distance from c1 along the center line to the radical line.
    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h_sq = r1 * r1 - a * a;

    let ux = (c2.x - c1.x) / d;
    let uy = (c2.y - c1.y) / d;
    let mid = Point2::new(c1.x + a * ux, c1.y + a * uy);

    if h_sq.abs() < TOLERANCE || h_sq < 0.0 {
        return CircleIntersection::Touching(mid);
    }

    let h = h_sq.sqrt();
    CircleIntersection::Crossing(
        Point2::new(mid.x - h * uy, mid.y + h * ux),
        Point2::new(mid.x + h * uy, mid.y - h * ux),
    )
}

/// Intersections of a segment with the boundary of an axis-aligned
/// rectangle given by its min and max corners.
#[must_use]
pub fn rect_intersect_segment(min: &Point2, max: &Point2, p1: &Point2, p2: &Point2) -> Vec<Point2> {
    let corners = [
        Point2::new(min.x, min.y),
        Point2::new(max.x, min.y),
        Point2::new(max.x, max.y),
        Point2::new(min.x, max.y),
    ];
    let mut hits: Vec<Point2> = Vec::new();
    for i in 0..4 {
        let e0 = corners[i];
        let e1 = corners[(i + 1) % 4];
        if let LineIntersection::Bounded(p) = line_line_intersection(&e0, &e1, p1, p2) {
            if !hits.iter().any(|q| distance(q, &p) < TOLERANCE) {
                hits.push(p);
            }
        }
    }
    hits
}
