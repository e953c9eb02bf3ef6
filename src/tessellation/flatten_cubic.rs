//! Adaptive flattening of a cubic Bezier segment.
//!
//! Recursive De Casteljau subdivision at the parametric midpoint with a
//! chord-deviation flatness test. Because every refinement splits at
//! `t = 0.5`, a finer tolerance always produces a superset of the
//! coarser tolerance's points, which keeps the accumulated chord length
//! monotonically non-decreasing as the approximation scale grows.

use crate::math::Point2;

/// Hard recursion bound; 2^32 subdivisions is far past f64 resolution.
const RECURSION_LIMIT: u32 = 32;

/// Splits a cubic Bezier given by 4 control points at parameter `t`.
///
/// Both halves together reproduce the original curve exactly.
#[must_use]
pub fn split_cubic(cp: &[Point2; 4], t: f64) -> ([Point2; 4], [Point2; 4]) {
    let lerp = |a: &Point2, b: &Point2| Point2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);

    let p12 = lerp(&cp[0], &cp[1]);
    let p23 = lerp(&cp[1], &cp[2]);
    let p34 = lerp(&cp[2], &cp[3]);
    let p123 = lerp(&p12, &p23);
    let p234 = lerp(&p23, &p34);
    let mid = lerp(&p123, &p234);

    ([cp[0], p12, p123, mid], [mid, p234, p34, cp[3]])
}

/// Flattens a cubic Bezier into a point sequence.
///
/// `tolerance` is the maximum allowed deviation of the control points
/// from the emitted chords, in device units. The result always starts
/// at `cp[0]` and ends at `cp[3]`.
#[must_use]
pub fn flatten_cubic(cp: &[Point2; 4], tolerance: f64) -> Vec<Point2> {
    let mut points = vec![cp[0]];
    recurse(cp, tolerance * tolerance, 0, &mut points);
    points
}

fn recurse(cp: &[Point2; 4], tolerance_sq: f64, depth: u32, out: &mut Vec<Point2>) {
    let dx = cp[3].x - cp[0].x;
    let dy = cp[3].y - cp[0].y;

    // Perpendicular deviation of the inner control points from the chord.
    let d2 = ((cp[1].x - cp[3].x) * dy - (cp[1].y - cp[3].y) * dx).abs();
    let d3 = ((cp[2].x - cp[3].x) * dy - (cp[2].y - cp[3].y) * dx).abs();

    if depth >= RECURSION_LIMIT || (d2 + d3) * (d2 + d3) <= tolerance_sq * (dx * dx + dy * dy) {
        out.push(cp[3]);
        return;
    }

    let (left, right) = split_cubic(cp, 0.5);
    recurse(&left, tolerance_sq, depth + 1, out);
    recurse(&right, tolerance_sq, depth + 1, out);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{distance, distance_2d::point_to_polyline_dist};

    fn eval(cp: &[Point2; 4], t: f64) -> Point2 {
        let mt = 1.0 - t;
        let w0 = mt * mt * mt;
        let w1 = 3.0 * mt * mt * t;
        let w2 = 3.0 * mt * t * t;
        let w3 = t * t * t;
        Point2::new(
            w0 * cp[0].x + w1 * cp[1].x + w2 * cp[2].x + w3 * cp[3].x,
            w0 * cp[0].y + w1 * cp[1].y + w2 * cp[2].y + w3 * cp[3].y,
        )
    }

    fn sample_curve() -> [Point2; 4] {
        [
            Point2::new(0.0, 0.0),
            Point2::new(50.0, 100.0),
            Point2::new(150.0, -100.0),
            Point2::new(200.0, 0.0),
        ]
    }

    #[test]
    fn split_halves_join_at_midpoint() {
        let cp = sample_curve();
        let (l, r) = split_cubic(&cp, 0.5);
        let mid = eval(&cp, 0.5);
        assert!(distance(&l[3], &mid) < 1e-12);
        assert!(distance(&r[0], &mid) < 1e-12);
        assert!(distance(&l[0], &cp[0]) < 1e-12);
        assert!(distance(&r[3], &cp[3]) < 1e-12);
    }

    #[test]
    fn split_halves_reproduce_original_shape() {
        let cp = sample_curve();
        let (l, r) = split_cubic(&cp, 0.3);
        // Points of the left half at s map to the original at 0.3·s.
        for i in 0..=10 {
            let s = f64::from(i) / 10.0;
            assert!(distance(&eval(&l, s), &eval(&cp, 0.3 * s)) < 1e-9);
            assert!(distance(&eval(&r, s), &eval(&cp, 0.3 + 0.7 * s)) < 1e-9);
        }
    }

    #[test]
    fn flatten_ends_match_curve_ends() {
        let cp = sample_curve();
        let pts = flatten_cubic(&cp, 0.5);
        assert!(pts.len() > 2);
        assert!(distance(&pts[0], &cp[0]) < 1e-12);
        assert!(distance(pts.last().unwrap(), &cp[3]) < 1e-12);
    }

    #[test]
    fn flatten_stays_near_curve() {
        let cp = sample_curve();
        let pts = flatten_cubic(&cp, 0.25);
        for i in 0..=50 {
            let t = f64::from(i) / 50.0;
            let d = point_to_polyline_dist(&eval(&cp, t), &pts);
            assert!(d < 0.5, "t={t} d={d}");
        }
    }

    #[test]
    fn finer_tolerance_refines_point_set() {
        let cp = sample_curve();
        let coarse = flatten_cubic(&cp, 1.0);
        let fine = flatten_cubic(&cp, 0.1);
        assert!(fine.len() >= coarse.len());
        // Midpoint splitting nests: every coarse point appears in the fine set.
        for p in &coarse {
            assert!(
                fine.iter().any(|q| distance(p, q) < 1e-9),
                "missing {p:?}"
            );
        }
    }

    #[test]
    fn degenerate_curve_terminates() {
        let p = Point2::new(5.0, 5.0);
        let pts = flatten_cubic(&[p, p, p, p], 0.5);
        assert_eq!(pts.len(), 2);
    }
}
