pub mod cubic_eq;
pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;
pub mod transform_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3x3 homogeneous transformation matrix for the plane.
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Pattern coordinates are expressed in device units at this resolution.
pub const PRINT_DPI: f64 = 96.0;

/// One millimetre in device units.
pub const ONE_MM: f64 = PRINT_DPI / 25.4;

/// Half-width of the capsule used by point-on-curve tests, in device units.
///
/// Matches the drafting accuracy of 0.12 mm at [`PRINT_DPI`].
pub const ACCURACY_POINT_ON_LINE: f64 = 0.12 * PRINT_DPI / 25.4;

/// Minimum length of a curve fragment produced by a cut, in device units (1 mm).
pub const MIN_CUT_LENGTH: f64 = ONE_MM;

/// Converts millimetres to device units.
#[must_use]
pub fn mm_to_units(mm: f64) -> f64 {
    mm * PRINT_DPI / 25.4
}

/// Relative fuzzy comparison of two scalars.
///
/// Degrades to an absolute comparison near zero so that values like
/// `1e-14` and `0.0` compare equal.
#[must_use]
pub fn fuzzy_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

/// Squared distance between two points.
#[must_use]
pub fn distance_sq(a: &Point2, b: &Point2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dx * dx + dy * dy
}

/// Distance between two points.
#[must_use]
pub fn distance(a: &Point2, b: &Point2) -> f64 {
    distance_sq(a, b).sqrt()
}

/// Whether two points coincide within [`ACCURACY_POINT_ON_LINE`].
#[must_use]
pub fn points_equal(a: &Point2, b: &Point2) -> bool {
    distance_sq(a, b) <= ACCURACY_POINT_ON_LINE * ACCURACY_POINT_ON_LINE
}

/// Normalizes an angle in degrees to `[0, 360)`.
#[must_use]
pub fn normalize_angle_deg(angle: f64) -> f64 {
    let a = angle % 360.0;
    if a < 0.0 {
        a + 360.0
    } else {
        a
    }
}

/// Direction angle of the ray `from → to` in degrees, in `[0, 360)`.
#[must_use]
pub fn line_angle_deg(from: &Point2, to: &Point2) -> f64 {
    normalize_angle_deg((to.y - from.y).atan2(to.x - from.x).to_degrees())
}

/// Counter-clockwise angle in degrees from the ray at `from_deg` to the
/// ray at `to_deg`, both anchored at the origin. Result in `[0, 360)`.
#[must_use]
pub fn angle_between_deg(from_deg: f64, to_deg: f64) -> f64 {
    normalize_angle_deg(to_deg - from_deg)
}

/// Point reached by travelling `dist` from `origin` at `angle_deg`.
#[must_use]
pub fn point_at_angle(origin: &Point2, dist: f64, angle_deg: f64) -> Point2 {
    let rad = angle_deg.to_radians();
    Point2::new(origin.x + dist * rad.cos(), origin.y + dist * rad.sin())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps_negative() {
        assert!((normalize_angle_deg(-90.0) - 270.0).abs() < TOLERANCE);
        assert!((normalize_angle_deg(720.0)).abs() < TOLERANCE);
        assert!((normalize_angle_deg(359.5) - 359.5).abs() < TOLERANCE);
    }

    #[test]
    fn line_angle_cardinal_directions() {
        let o = Point2::new(0.0, 0.0);
        assert!((line_angle_deg(&o, &Point2::new(1.0, 0.0))).abs() < TOLERANCE);
        assert!((line_angle_deg(&o, &Point2::new(0.0, 1.0)) - 90.0).abs() < TOLERANCE);
        assert!((line_angle_deg(&o, &Point2::new(-1.0, 0.0)) - 180.0).abs() < TOLERANCE);
        assert!((line_angle_deg(&o, &Point2::new(0.0, -1.0)) - 270.0).abs() < TOLERANCE);
    }

    #[test]
    fn angle_between_is_ccw() {
        assert!((angle_between_deg(10.0, 40.0) - 30.0).abs() < TOLERANCE);
        assert!((angle_between_deg(40.0, 10.0) - 330.0).abs() < TOLERANCE);
        assert!((angle_between_deg(350.0, 10.0) - 20.0).abs() < TOLERANCE);
    }

    #[test]
    fn fuzzy_equal_near_zero() {
        assert!(fuzzy_equal(1e-14, 0.0));
        assert!(!fuzzy_equal(1e-3, 0.0));
        assert!(fuzzy_equal(1000.0, 1000.0 + 1e-7));
    }

    #[test]
    fn one_mm_matches_dpi() {
        assert!((ONE_MM - 3.779_527_559_055_118).abs() < 1e-12);
        assert!((mm_to_units(10.0) - 10.0 * ONE_MM).abs() < TOLERANCE);
    }

    #[test]
    fn point_at_angle_quarter_turn() {
        let p = point_at_angle(&Point2::new(1.0, 1.0), 2.0, 90.0);
        assert!((p.x - 1.0).abs() < TOLERANCE);
        assert!((p.y - 3.0).abs() < TOLERANCE);
    }
}
