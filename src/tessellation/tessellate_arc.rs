//! Tessellation of circular and elliptical arcs.

use crate::math::{Point2, TOLERANCE};

use super::{resolve_scale, ARC_SAGITTA_TOLERANCE};

/// Maximum angular step at scale 1, in degrees.
///
/// Bounds the area error of the sampled polygon independently of the
/// radius; the sagitta criterion alone lets small radii take steps far
/// too coarse for area computations.
const MAX_STEP_DEG: f64 = 5.0;

/// Upper bound on segments for a single arc.
const MAX_SEGMENTS: usize = 2048;

/// Number of chord segments needed to approximate an arc.
///
/// Combines the sagitta criterion (maximum chord deviation) with a flat
/// angular-step cap; both tighten proportionally to the approximation
/// scale.
#[must_use]
pub fn arc_segment_count(radius: f64, sweep_deg: f64, scale: f64) -> usize {
    let scale = resolve_scale(scale);
    let sweep = sweep_deg.abs().to_radians();
    if radius < TOLERANCE || sweep < TOLERANCE {
        return 1;
    }

    let sagitta = ARC_SAGITTA_TOLERANCE / scale;
    let sagitta_step = if sagitta >= radius {
        std::f64::consts::PI
    } else {
        2.0 * (1.0 - sagitta / radius).acos()
    };
    let max_step = sagitta_step.min((MAX_STEP_DEG / scale).to_radians());

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (sweep / max_step).ceil() as usize;
    n.clamp(1, MAX_SEGMENTS)
}

/// Samples a circular arc into a point sequence.
///
/// `sweep_deg` is signed: positive sweeps counter-clockwise, negative
/// clockwise. The sequence always contains the exact start and end
/// points; a zero sweep yields the single boundary point.
#[must_use]
pub fn sample_arc(
    center: &Point2,
    radius: f64,
    start_deg: f64,
    sweep_deg: f64,
    scale: f64,
) -> Vec<Point2> {
    let at = |deg: f64| {
        let rad = deg.to_radians();
        Point2::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
    };

    if sweep_deg.abs() < TOLERANCE {
        return vec![at(start_deg)];
    }

    let n = arc_segment_count(radius, sweep_deg, scale);
    let mut points = Vec::with_capacity(n + 1);
    for i in 0..=n {
        #[allow(clippy::cast_precision_loss)]
        let angle = start_deg + sweep_deg * (i as f64) / (n as f64);
        points.push(at(angle));
    }
    points
}

/// Samples an elliptical arc into a point sequence.
///
/// `start_deg` and `sweep_deg` are parametric angles of the ellipse
/// `(r1·cos t, r2·sin t)`, rotated by `rotation_deg` about the center.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn sample_ellipse_arc(
    center: &Point2,
    radius1: f64,
    radius2: f64,
    rotation_deg: f64,
    start_deg: f64,
    sweep_deg: f64,
    scale: f64,
) -> Vec<Point2> {
    let rot = rotation_deg.to_radians();
    let (rot_sin, rot_cos) = rot.sin_cos();
    let at = |deg: f64| {
        let rad = deg.to_radians();
        let ex = radius1 * rad.cos();
        let ey = radius2 * rad.sin();
        Point2::new(
            center.x + ex * rot_cos - ey * rot_sin,
            center.y + ex * rot_sin + ey * rot_cos,
        )
    };

    if sweep_deg.abs() < TOLERANCE {
        return vec![at(start_deg)];
    }

    let n = arc_segment_count(radius1.abs().max(radius2.abs()), sweep_deg, scale);
    let mut points = Vec::with_capacity(n + 1);
    for i in 0..=n {
        #[allow(clippy::cast_precision_loss)]
        let angle = start_deg + sweep_deg * (i as f64) / (n as f64);
        points.push(at(angle));
    }
    points
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::distance;

    #[test]
    fn count_grows_with_scale() {
        let coarse = arc_segment_count(100.0, 360.0, 1.0);
        let fine = arc_segment_count(100.0, 360.0, 4.0);
        assert!(fine > coarse, "coarse={coarse} fine={fine}");
    }

    #[test]
    fn count_bounded_for_tiny_and_huge_radii() {
        assert_eq!(arc_segment_count(0.0, 360.0, 1.0), 1);
        assert!(arc_segment_count(1e9, 360.0, 10.0) <= MAX_SEGMENTS);
    }

    #[test]
    fn sampled_points_lie_on_circle() {
        let c = Point2::new(10.0, -5.0);
        let pts = sample_arc(&c, 50.0, 30.0, 200.0, 1.0);
        for p in &pts {
            assert!((distance(&c, p) - 50.0).abs() < 1e-9, "p={p:?}");
        }
    }

    #[test]
    fn sample_ends_are_exact() {
        let c = Point2::new(0.0, 0.0);
        let pts = sample_arc(&c, 1.0, 0.0, 90.0, 1.0);
        let first = pts.first().unwrap();
        let last = pts.last().unwrap();
        assert!((first.x - 1.0).abs() < 1e-12 && first.y.abs() < 1e-12);
        assert!(last.x.abs() < 1e-12 && (last.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn negative_sweep_goes_clockwise() {
        let c = Point2::new(0.0, 0.0);
        let pts = sample_arc(&c, 1.0, 90.0, -90.0, 1.0);
        // From (0, 1) clockwise down to (1, 0).
        assert!(pts[0].x.abs() < 1e-12);
        let last = pts.last().unwrap();
        assert!((last.x - 1.0).abs() < 1e-12);
        // Second point has smaller angle than the first.
        assert!(pts[1].y < 1.0);
        assert!(pts[1].x > 0.0);
    }

    #[test]
    fn zero_sweep_yields_single_point() {
        let pts = sample_arc(&Point2::new(0.0, 0.0), 1.0, 45.0, 0.0, 1.0);
        assert_eq!(pts.len(), 1);
    }

    #[test]
    fn ellipse_points_satisfy_ellipse_equation() {
        let c = Point2::new(2.0, 3.0);
        let pts = sample_ellipse_arc(&c, 4.0, 2.0, 0.0, 0.0, 360.0, 1.0);
        for p in &pts {
            let v = ((p.x - c.x) / 4.0).powi(2) + ((p.y - c.y) / 2.0).powi(2);
            assert!((v - 1.0).abs() < 1e-9, "p={p:?}");
        }
    }

    #[test]
    fn rotated_ellipse_major_axis_follows_rotation() {
        let c = Point2::new(0.0, 0.0);
        let pts = sample_ellipse_arc(&c, 4.0, 2.0, 90.0, 0.0, 0.0, 1.0);
        // Parametric angle 0 lands on the major axis, rotated onto +Y.
        let p = pts[0];
        assert!(p.x.abs() < 1e-9, "p={p:?}");
        assert!((p.y - 4.0).abs() < 1e-9, "p={p:?}");
    }
}
