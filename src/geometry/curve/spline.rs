//! Single cubic Bezier segments.

use crate::error::Result;
use crate::math::cubic_eq::solve_cubic;
use crate::math::transform_2d::{apply, reflection_matrix};
use crate::math::{
    distance, line_angle_deg, normalize_angle_deg, point_at_angle, Point2, TOLERANCE,
};
use crate::tessellation::{flatten_cubic, resolve_scale, split_cubic, FLATTEN_TOLERANCE};

use super::super::{FormulaValue, ObjectKind, ObjectMeta, PatternPoint};
use super::{clamp_cut_length, Curve, CutPolicy};

/// A single cubic Bezier segment.
///
/// Stored as its two endpoints plus a polar handle per endpoint: `p2`
/// lies on the ray from `p1` at `angle1` at distance `c1_length`, and
/// `p3` on the ray from `p4` at `angle2` at distance `c2_length`. The
/// handle angles and lengths each keep their source formula.
#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    meta: ObjectMeta,
    p1: PatternPoint,
    p4: PatternPoint,
    angle1: FormulaValue,
    angle2: FormulaValue,
    c1_length: FormulaValue,
    c2_length: FormulaValue,
}

impl Spline {
    #[must_use]
    pub fn new(
        p1: PatternPoint,
        p4: PatternPoint,
        angle1: f64,
        angle2: f64,
        c1_length: f64,
        c2_length: f64,
    ) -> Self {
        Self::with_formulas(
            p1,
            p4,
            FormulaValue::from_value(angle1),
            FormulaValue::from_value(angle2),
            FormulaValue::from_value(c1_length),
            FormulaValue::from_value(c2_length),
        )
    }

    #[must_use]
    pub fn with_formulas(
        p1: PatternPoint,
        p4: PatternPoint,
        angle1: FormulaValue,
        angle2: FormulaValue,
        c1_length: FormulaValue,
        c2_length: FormulaValue,
    ) -> Self {
        Self {
            meta: ObjectMeta::default(),
            p1,
            p4,
            angle1,
            angle2,
            c1_length,
            c2_length,
        }
    }

    /// Builds a segment from its four raw control points.
    #[must_use]
    pub fn from_points(p1: PatternPoint, p2: &Point2, p3: &Point2, p4: PatternPoint) -> Self {
        let start = p1.to_point2();
        let end = p4.to_point2();
        let angle1 = line_angle_deg(&start, p2);
        let angle2 = line_angle_deg(&end, p3);
        let c1 = distance(&start, p2);
        let c2 = distance(&end, p3);
        Self::new(p1, p4, angle1, angle2, c1, c2)
    }

    #[must_use]
    pub fn p1(&self) -> &PatternPoint {
        &self.p1
    }

    #[must_use]
    pub fn p4(&self) -> &PatternPoint {
        &self.p4
    }

    /// First control point, derived from the start handle.
    #[must_use]
    pub fn p2(&self) -> Point2 {
        point_at_angle(
            &self.p1.to_point2(),
            self.c1_length.value(),
            self.angle1.value(),
        )
    }

    /// Second control point, derived from the end handle.
    #[must_use]
    pub fn p3(&self) -> Point2 {
        point_at_angle(
            &self.p4.to_point2(),
            self.c2_length.value(),
            self.angle2.value(),
        )
    }

    #[must_use]
    pub fn angle1(&self) -> &FormulaValue {
        &self.angle1
    }

    #[must_use]
    pub fn angle2(&self) -> &FormulaValue {
        &self.angle2
    }

    #[must_use]
    pub fn c1_length(&self) -> &FormulaValue {
        &self.c1_length
    }

    #[must_use]
    pub fn c2_length(&self) -> &FormulaValue {
        &self.c2_length
    }

    pub fn set_start_handle(&mut self, angle: FormulaValue, length: FormulaValue) {
        self.angle1 = angle;
        self.c1_length = length;
    }

    pub fn set_end_handle(&mut self, angle: FormulaValue, length: FormulaValue) {
        self.angle2 = angle;
        self.c2_length = length;
    }

    /// The four control points `p1, p2, p3, p4`.
    #[must_use]
    pub fn control_points(&self) -> [Point2; 4] {
        [self.p1.to_point2(), self.p2(), self.p3(), self.p4.to_point2()]
    }

    /// De Casteljau evaluation at `t ∈ [0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let [p1, p2, p3, p4] = self.control_points();
        let t = t.clamp(0.0, 1.0);
        let mt = 1.0 - t;
        let w0 = mt * mt * mt;
        let w1 = 3.0 * mt * mt * t;
        let w2 = 3.0 * mt * t * t;
        let w3 = t * t * t;
        Point2::new(
            w0 * p1.x + w1 * p2.x + w2 * p3.x + w3 * p4.x,
            w0 * p1.y + w1 * p2.y + w2 * p3.y + w3 * p4.y,
        )
    }

    /// First derivative with respect to `t`.
    #[must_use]
    pub fn derivative_at(&self, t: f64) -> Point2 {
        let [p1, p2, p3, p4] = self.control_points();
        let t = t.clamp(0.0, 1.0);
        let mt = 1.0 - t;
        let w0 = 3.0 * mt * mt;
        let w1 = 6.0 * mt * t;
        let w2 = 3.0 * t * t;
        Point2::new(
            w0 * (p2.x - p1.x) + w1 * (p3.x - p2.x) + w2 * (p4.x - p3.x),
            w0 * (p2.y - p1.y) + w1 * (p3.y - p2.y) + w2 * (p4.y - p3.y),
        )
    }

    /// Whether the four control points are collinear.
    #[must_use]
    pub fn is_linear(&self) -> bool {
        let [p1, p2, p3, p4] = self.control_points();
        let chord = distance(&p1, &p4);
        if chord < TOLERANCE {
            return distance(&p1, &p2) < TOLERANCE && distance(&p1, &p3) < TOLERANCE;
        }
        let dev = |p: &Point2| {
            ((p4.x - p1.x) * (p.y - p1.y) - (p4.y - p1.y) * (p.x - p1.x)).abs() / chord
        };
        dev(&p2) < 1e-6 && dev(&p3) < 1e-6
    }

    /// Splits the segment at parameter `t`; the two halves together
    /// reproduce the original shape exactly.
    #[must_use]
    pub fn split_at(&self, t: f64) -> (Self, Self) {
        let (left, right) = split_cubic(&self.control_points(), t.clamp(0.0, 1.0));
        (self.child_from(&left), self.child_from(&right))
    }

    fn child_from(&self, cp: &[Point2; 4]) -> Self {
        let mut child = Self::from_points(
            PatternPoint::from_point2(&cp[0]),
            &cp[1],
            &cp[2],
            PatternPoint::from_point2(&cp[3]),
        );
        child
            .meta
            .set_approximation_scale(self.meta.approximation_scale());
        child
    }

    /// Parameter whose arc length from `p1` equals `length`.
    ///
    /// The cut point is located on the tessellation, then the parameter
    /// is recovered by solving the cubic coordinate equations and
    /// keeping the root in `[0, 1]` whose partial length is closest to
    /// the request. Near-linear segments use the exact length fraction.
    #[must_use]
    pub fn parameter_at_length(&self, length: f64) -> f64 {
        let total = self.length();
        if total < TOLERANCE {
            return 0.0;
        }
        let len = length.clamp(0.0, total);

        if self.is_linear() {
            return len / total;
        }

        let target = self.point_on_tessellation(len);
        let [p1, p2, p3, p4] = self.control_points();

        let coeffs = |v1: f64, v2: f64, v3: f64, v4: f64, target: f64| {
            // Power-basis coefficients of the coordinate polynomial.
            let a = v4 - 3.0 * v3 + 3.0 * v2 - v1;
            let b = 3.0 * (v3 - 2.0 * v2 + v1);
            let c = 3.0 * (v2 - v1);
            let d = v1 - target;
            (d, c, b, a)
        };

        let mut candidates: Vec<f64> = Vec::new();
        let (d, c, b, a) = coeffs(p1.x, p2.x, p3.x, p4.x, target.x);
        candidates.extend(solve_cubic(d, c, b, a));
        let (d, c, b, a) = coeffs(p1.y, p2.y, p3.y, p4.y, target.y);
        candidates.extend(solve_cubic(d, c, b, a));

        let mut best: Option<(f64, f64)> = None;
        for t in candidates {
            if !(-1e-6..=1.0 + 1e-6).contains(&t) {
                continue;
            }
            let t = t.clamp(0.0, 1.0);
            let (left, _) = self.split_at(t);
            let miss = (left.length() - len).abs();
            if best.is_none_or(|(m, _)| miss < m) {
                best = Some((miss, t));
            }
        }
        best.map_or(len / total, |(_, t)| t)
    }

    /// Parameter at which the curve passes through `point`, if it does.
    ///
    /// Solves the cubic coordinate equations and keeps the root in
    /// `[0, 1]` that actually evaluates back to `point` within the
    /// drafting accuracy.
    #[must_use]
    pub fn parameter_of_point(&self, point: &Point2) -> Option<f64> {
        let [p1, p2, p3, p4] = self.control_points();

        let coeffs = |v1: f64, v2: f64, v3: f64, v4: f64, target: f64| {
            let a = v4 - 3.0 * v3 + 3.0 * v2 - v1;
            let b = 3.0 * (v3 - 2.0 * v2 + v1);
            let c = 3.0 * (v2 - v1);
            let d = v1 - target;
            (d, c, b, a)
        };

        let mut candidates: Vec<f64> = Vec::new();
        let (d, c, b, a) = coeffs(p1.x, p2.x, p3.x, p4.x, point.x);
        candidates.extend(solve_cubic(d, c, b, a));
        let (d, c, b, a) = coeffs(p1.y, p2.y, p3.y, p4.y, point.y);
        candidates.extend(solve_cubic(d, c, b, a));

        let mut best: Option<(f64, f64)> = None;
        for t in candidates {
            if !(-1e-6..=1.0 + 1e-6).contains(&t) {
                continue;
            }
            let t = t.clamp(0.0, 1.0);
            let miss = distance(&self.point_at(t), point);
            if miss <= crate::math::ACCURACY_POINT_ON_LINE
                && best.is_none_or(|(m, _)| miss < m)
            {
                best = Some((miss, t));
            }
        }
        best.map(|(_, t)| t)
    }

    fn point_on_tessellation(&self, len: f64) -> Point2 {
        let points = self.get_points();
        let mut remaining = len;
        for pair in points.windows(2) {
            let chord = distance(&pair[0], &pair[1]);
            if chord >= remaining && chord > TOLERANCE {
                let f = remaining / chord;
                return Point2::new(
                    pair[0].x + (pair[1].x - pair[0].x) * f,
                    pair[0].y + (pair[1].y - pair[0].y) * f,
                );
            }
            remaining -= chord;
        }
        self.p4.to_point2()
    }

    /// Splits the segment at the point reached after travelling
    /// `length` along the curve.
    ///
    /// # Errors
    ///
    /// Short curves and out-of-range lengths follow the [`CutPolicy`],
    /// as for [`super::Arc::cut`].
    pub fn cut(&self, length: f64, policy: CutPolicy) -> Result<(Point2, Self, Self)> {
        let total = self.length();
        let len = clamp_cut_length(length, total, policy, self.meta.name())?;
        let t = self.parameter_at_length(len);
        let (first, second) = self.split_at(t);
        Ok((self.point_at(t), first, second))
    }

    /// Whether the tessellated curve winds clockwise.
    #[must_use]
    pub fn is_clockwise(&self) -> bool {
        crate::math::polygon_2d::is_clockwise(&self.get_points())
    }

    /// Copy travelling in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut rev = Self::with_formulas(
            self.p4.clone(),
            self.p1.clone(),
            self.angle2.clone(),
            self.angle1.clone(),
            self.c2_length.clone(),
            self.c1_length.clone(),
        );
        rev.meta = self.meta.clone();
        rev
    }

    /// Rotated copy.
    #[must_use]
    pub fn rotate(&self, origin: &Point2, degrees: f64, suffix: &str) -> Self {
        let mut rotated = self.clone();
        rotated.p1 = self.p1.rotate(origin, degrees, "");
        rotated.p4 = self.p4.rotate(origin, degrees, "");
        rotated.angle1 =
            FormulaValue::from_value(normalize_angle_deg(self.angle1.value() + degrees));
        rotated.angle2 =
            FormulaValue::from_value(normalize_angle_deg(self.angle2.value() + degrees));
        rotated.suffix_name(suffix);
        rotated
    }

    /// Mirrored copy.
    #[must_use]
    pub fn flip(&self, axis_p1: &Point2, axis_p2: &Point2, suffix: &str) -> Self {
        let m = reflection_matrix(axis_p1, axis_p2);
        let axis_angle = line_angle_deg(axis_p1, axis_p2);
        let mut flipped = self.clone();
        flipped.p1 = PatternPoint::from_point2(&apply(&m, &self.p1.to_point2()));
        flipped.p4 = PatternPoint::from_point2(&apply(&m, &self.p4.to_point2()));
        flipped.angle1 = FormulaValue::from_value(normalize_angle_deg(
            2.0 * axis_angle - self.angle1.value(),
        ));
        flipped.angle2 = FormulaValue::from_value(normalize_angle_deg(
            2.0 * axis_angle - self.angle2.value(),
        ));
        flipped.suffix_name(suffix);
        flipped
    }

    /// Translated copy.
    #[must_use]
    pub fn move_by(&self, dist: f64, angle_deg: f64, suffix: &str) -> Self {
        let mut moved = self.clone();
        moved.p1 = self.p1.move_by(dist, angle_deg, "");
        moved.p4 = self.p4.move_by(dist, angle_deg, "");
        moved.suffix_name(suffix);
        moved
    }

    fn suffix_name(&mut self, suffix: &str) {
        if !suffix.is_empty() {
            let name = format!("{}{}", self.meta.name(), suffix);
            self.meta.set_name(name);
        }
    }
}

impl Curve for Spline {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Spline
    }

    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    fn get_points(&self) -> Vec<Point2> {
        let scale = resolve_scale(self.meta.approximation_scale());
        flatten_cubic(&self.control_points(), FLATTEN_TOLERANCE / scale)
    }

    fn length(&self) -> f64 {
        self.get_points()
            .windows(2)
            .map(|p| distance(&p[0], &p[1]))
            .sum()
    }

    fn start_angle(&self) -> f64 {
        if self.c1_length.value().abs() > TOLERANCE {
            normalize_angle_deg(self.angle1.value())
        } else {
            line_angle_deg(&self.p1.to_point2(), &self.p4.to_point2())
        }
    }

    fn end_angle(&self) -> f64 {
        if self.c2_length.value().abs() > TOLERANCE {
            normalize_angle_deg(self.angle2.value() + 180.0)
        } else {
            line_angle_deg(&self.p1.to_point2(), &self.p4.to_point2())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::distance_2d::point_to_polyline_dist;
    use approx::assert_relative_eq;

    fn curved() -> Spline {
        // Quarter-circle-ish segment from (0,0) to (100,100).
        Spline::from_points(
            PatternPoint::new(0.0, 0.0),
            &Point2::new(55.0, 0.0),
            &Point2::new(100.0, 45.0),
            PatternPoint::new(100.0, 100.0),
        )
    }

    // ── evaluation tests ──

    #[test]
    fn endpoints_are_exact() {
        let s = curved();
        assert!(distance(&s.point_at(0.0), &Point2::new(0.0, 0.0)) < 1e-12);
        assert!(distance(&s.point_at(1.0), &Point2::new(100.0, 100.0)) < 1e-12);
    }

    #[test]
    fn handles_reconstruct_control_points() {
        let s = curved();
        assert!(distance(&s.p2(), &Point2::new(55.0, 0.0)) < 1e-9);
        assert!(distance(&s.p3(), &Point2::new(100.0, 45.0)) < 1e-9);
    }

    #[test]
    fn derivative_at_start_follows_first_handle() {
        let s = curved();
        let d = s.derivative_at(0.0);
        // Tangent at t=0 is 3·(p2 − p1), pointing along +X here.
        assert_relative_eq!(d.x, 165.0, max_relative = 1e-9);
        assert!(d.y.abs() < 1e-9);
        assert_relative_eq!(Curve::start_angle(&s), 0.0, epsilon = 1e-9);
        assert_relative_eq!(Curve::end_angle(&s), 90.0, max_relative = 1e-9);
    }

    #[test]
    fn point_at_matches_de_casteljau_split() {
        let s = curved();
        for t in [0.2, 0.5, 0.8] {
            let (left, right) = s.split_at(t);
            let p = s.point_at(t);
            assert!(distance(&left.p4.to_point2(), &p) < 1e-9);
            assert!(distance(&right.p1.to_point2(), &p) < 1e-9);
        }
    }

    // ── length tests ──

    #[test]
    fn length_between_chord_and_polygon() {
        let s = curved();
        let chord = distance(&s.p1.to_point2(), &s.p4.to_point2());
        let [p1, p2, p3, p4] = s.control_points();
        let hull = distance(&p1, &p2) + distance(&p2, &p3) + distance(&p3, &p4);
        let len = s.length();
        assert!(len > chord && len < hull, "len={len}");
    }

    #[test]
    fn length_monotone_in_approximation_scale() {
        let mut s = curved();
        let mut prev = 0.0;
        for scale in [0.2, 1.0, 4.0, 10.0] {
            s.meta_mut().set_approximation_scale(scale);
            let len = s.length();
            assert!(len >= prev, "scale={scale} len={len} prev={prev}");
            prev = len;
        }
    }

    // ── linearity tests ──

    #[test]
    fn collinear_control_points_are_linear() {
        let s = Spline::from_points(
            PatternPoint::new(0.0, 0.0),
            &Point2::new(10.0, 10.0),
            &Point2::new(60.0, 60.0),
            PatternPoint::new(100.0, 100.0),
        );
        assert!(s.is_linear());
        assert!(!curved().is_linear());
    }

    #[test]
    fn linear_parameter_is_exact_fraction() {
        let s = Spline::from_points(
            PatternPoint::new(0.0, 0.0),
            &Point2::new(25.0, 0.0),
            &Point2::new(50.0, 0.0),
            PatternPoint::new(100.0, 0.0),
        );
        let total = s.length();
        for frac in [0.1, 0.25, 0.5, 0.9] {
            let t = s.parameter_at_length(frac * total);
            assert_relative_eq!(t, frac, max_relative = 1e-9);
        }
    }

    #[test]
    fn parameter_at_length_recovers_partial_length() {
        let s = curved();
        let total = s.length();
        for frac in [0.2, 0.5, 0.75] {
            let t = s.parameter_at_length(frac * total);
            let (left, _) = s.split_at(t);
            assert_relative_eq!(left.length(), frac * total, max_relative = 1e-3);
        }
    }

    // ── cut tests ──

    #[test]
    fn cut_halves_reproduce_shape() {
        let s = curved();
        let total = s.length();
        let (point, first, second) = s.cut(total * 0.4, CutPolicy::Pedantic).unwrap();

        assert!(distance(&first.p4.to_point2(), &point) < 1e-9);
        assert!(distance(&second.p1.to_point2(), &point) < 1e-9);
        assert_relative_eq!(first.length() + second.length(), total, max_relative = 1e-6);

        // Every sampled point of each half lies on the original curve,
        // up to the flatness tolerance of both tessellations.
        let original = s.get_points();
        for p in first.get_points().iter().chain(second.get_points().iter()) {
            assert!(point_to_polyline_dist(p, &original) < 1.0, "p={p:?}");
        }
    }

    #[test]
    fn cut_out_of_range_follows_policy() {
        let s = curved();
        assert!(s.cut(0.01, CutPolicy::Pedantic).is_err());
        let (_, first, _) = s.cut(0.01, CutPolicy::Lenient).unwrap();
        assert_relative_eq!(
            first.length(),
            crate::math::MIN_CUT_LENGTH,
            max_relative = 0.05
        );
    }

    // ── orientation and transform tests ──

    #[test]
    fn winding_flips_with_direction() {
        let s = curved();
        assert_ne!(s.is_clockwise(), s.reversed().is_clockwise());
    }

    #[test]
    fn reversed_preserves_shape_and_length() {
        let s = curved();
        let r = s.reversed();
        assert_relative_eq!(r.length(), s.length(), max_relative = 1e-9);
        let pts = s.get_points();
        for p in r.get_points() {
            assert!(point_to_polyline_dist(&p, &pts) < 1e-6);
        }
    }

    #[test]
    fn rotate_and_flip_preserve_length() {
        let s = curved();
        let rot = s.rotate(&Point2::new(30.0, -10.0), 67.0, "r");
        assert_relative_eq!(rot.length(), s.length(), max_relative = 1e-9);
        let flip = s.flip(&Point2::new(0.0, 0.0), &Point2::new(1.0, 3.0), "m");
        assert_relative_eq!(flip.length(), s.length(), max_relative = 1e-9);
    }
}
