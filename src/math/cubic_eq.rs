//! Real root finding for quadratic and cubic polynomials.
//!
//! The cubic solver follows Blinn's depressed-cubic formulation, which
//! stays stable for the near-degenerate coefficient sets that show up
//! when recovering a Bezier parameter from a coordinate value.

use arrayvec::ArrayVec;

/// Real roots of `c0 + c1·x + c2·x² = 0`.
///
/// Falls back to the linear equation when `c2` vanishes. In the fully
/// degenerate all-zero case a single `0.0` is returned.
#[must_use]
pub fn solve_quadratic(c0: f64, c1: f64, c2: f64) -> ArrayVec<f64, 2> {
    let mut roots = ArrayVec::new();
    let sc0 = c0 / c2;
    let sc1 = c1 / c2;
    if !sc0.is_finite() || !sc1.is_finite() {
        // Quadratic coefficient is zero or nearly so; treat as linear.
        let root = -c0 / c1;
        if root.is_finite() {
            roots.push(root);
        } else if c0 == 0.0 && c1 == 0.0 {
            roots.push(0.0);
        }
        return roots;
    }
    let arg = sc1 * sc1 - 4.0 * sc0;
    let root1 = if !arg.is_finite() {
        // sc1² overflowed; one root from sc1·x + x² = 0, the other below.
        -sc1
    } else {
        if arg < 0.0 {
            return roots;
        } else if arg == 0.0 {
            roots.push(-0.5 * sc1);
            return roots;
        }
        // Citardauq form: avoids cancellation when sc1 dominates.
        -0.5 * (sc1 + arg.sqrt().copysign(sc1))
    };
    let root2 = sc0 / root1;
    if root2.is_finite() {
        if root2 > root1 {
            roots.push(root1);
            roots.push(root2);
        } else {
            roots.push(root2);
            roots.push(root1);
        }
    } else {
        roots.push(root1);
    }
    roots
}

/// Real roots of `c0 + c1·x + c2·x² + c3·x³ = 0`.
///
/// Handles a vanishing `c3` by delegating to [`solve_quadratic`].
#[must_use]
pub fn solve_cubic(c0: f64, c1: f64, c2: f64, c3: f64) -> ArrayVec<f64, 3> {
    let mut roots = ArrayVec::new();
    const ONE_THIRD: f64 = 1.0 / 3.0;
    let c3_recip = c3.recip();
    let sc2 = c2 * (ONE_THIRD * c3_recip);
    let sc1 = c1 * (ONE_THIRD * c3_recip);
    let sc0 = c0 * c3_recip;
    if !(sc0.is_finite() && sc1.is_finite() && sc2.is_finite()) {
        // Cubic coefficient is zero or nearly so.
        for root in solve_quadratic(c0, c1, c2) {
            roots.push(root);
        }
        return roots;
    }

    // Hessian of the depressed cubic.
    let d0 = (-sc2).mul_add(sc2, sc1);
    let d1 = (-sc1).mul_add(sc2, sc0);
    let d2 = sc2 * sc0 - sc1 * sc1;
    let discr = 4.0 * d0 * d2 - d1 * d1;
    let de = (-2.0 * sc2).mul_add(d0, d1);

    if discr < 0.0 {
        let sq = (-0.25 * discr).sqrt();
        let r = -0.5 * de;
        let t1 = (r + sq).cbrt() + (r - sq).cbrt();
        roots.push(t1 - sc2);
    } else if discr == 0.0 {
        let t1 = (-d0).sqrt().copysign(de);
        roots.push(t1 - sc2);
        roots.push(-2.0 * t1 - sc2);
    } else {
        let th = discr.sqrt().atan2(-de) * ONE_THIRD;
        let (th_sin, th_cos) = th.sin_cos();
        let r0 = th_cos;
        let ss3 = th_sin * 3.0_f64.sqrt();
        let r1 = 0.5 * (-th_cos + ss3);
        let r2 = 0.5 * (-th_cos - ss3);
        let t = 2.0 * (-d0).sqrt();
        roots.push(t.mul_add(r0, -sc2));
        roots.push(t.mul_add(r1, -sc2));
        roots.push(t.mul_add(r2, -sc2));
    }
    roots
}
