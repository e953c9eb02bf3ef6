//! Planar affine transforms in homogeneous form.

use super::{distance, Matrix3, Point2, TOLERANCE};

/// Rotation by `degrees` counter-clockwise about `origin`.
#[must_use]
pub fn rotation_matrix(origin: &Point2, degrees: f64) -> Matrix3 {
    let rad = degrees.to_radians();
    let (s, c) = rad.sin_cos();
    let tx = origin.x - c * origin.x + s * origin.y;
    let ty = origin.y - s * origin.x - c * origin.y;
    Matrix3::new(c, -s, tx, s, c, ty, 0.0, 0.0, 1.0)
}

/// Reflection across the line through `axis_p1` and `axis_p2`.
///
/// Built as translate-to-origin, rotate the axis onto X, scale Y by -1,
/// rotate back, translate back. A degenerate axis yields the identity.
#[must_use]
pub fn reflection_matrix(axis_p1: &Point2, axis_p2: &Point2) -> Matrix3 {
    let len = distance(axis_p1, axis_p2);
    if len < TOLERANCE {
        return Matrix3::identity();
    }
    let cos_t = (axis_p2.x - axis_p1.x) / len;
    let sin_t = (axis_p2.y - axis_p1.y) / len;

    // Composition of R(θ)·S(1,-1)·R(−θ) in closed form.
    let a = cos_t * cos_t - sin_t * sin_t;
    let b = 2.0 * sin_t * cos_t;
    let linear = Matrix3::new(a, b, 0.0, b, -a, 0.0, 0.0, 0.0, 1.0);

    let to_origin = Matrix3::new(
        1.0, 0.0, -axis_p1.x, //
        0.0, 1.0, -axis_p1.y, //
        0.0, 0.0, 1.0,
    );
    let back = Matrix3::new(
        1.0, 0.0, axis_p1.x, //
        0.0, 1.0, axis_p1.y, //
        0.0, 0.0, 1.0,
    );
    back * linear * to_origin
}

/// Applies a homogeneous transform to a point.
#[must_use]
pub fn apply(m: &Matrix3, p: &Point2) -> Point2 {
    m.transform_point(p)
}
