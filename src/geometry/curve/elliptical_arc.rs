//! Elliptical arcs.

use crate::error::Result;
use crate::math::transform_2d::{apply, reflection_matrix};
use crate::math::{distance, line_angle_deg, mm_to_units, normalize_angle_deg, Point2, TOLERANCE};
use crate::tessellation::{sample_arc, sample_ellipse_arc};

use super::super::{FormulaValue, ObjectKind, ObjectMeta, PatternPoint};
use super::{clamp_cut_length, Curve, CutPolicy};
use super::arc::ArcData;

/// Radius of the marker drawn for a degenerate elliptical arc, mm.
const DEGENERATE_MARKER_MM: f64 = 0.5;

/// An elliptical arc.
///
/// The boundary angles stored in [`ArcData`] are *parametric* angles of
/// the unrotated ellipse `(r1·cos t, r2·sin t)`; `rotation_angle` then
/// turns the whole ellipse about its center.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipticalArc {
    meta: ObjectMeta,
    data: ArcData,
    radius1: FormulaValue,
    radius2: FormulaValue,
    rotation_angle: FormulaValue,
}

impl EllipticalArc {
    #[must_use]
    pub fn new(
        center: PatternPoint,
        radius1: f64,
        radius2: f64,
        start_angle: f64,
        end_angle: f64,
        rotation_angle: f64,
    ) -> Self {
        Self::with_formulas(
            center,
            FormulaValue::from_value(radius1),
            FormulaValue::from_value(radius2),
            FormulaValue::from_value(start_angle),
            FormulaValue::from_value(end_angle),
            FormulaValue::from_value(rotation_angle),
        )
    }

    #[must_use]
    pub fn with_formulas(
        center: PatternPoint,
        radius1: FormulaValue,
        radius2: FormulaValue,
        start_angle: FormulaValue,
        end_angle: FormulaValue,
        rotation_angle: FormulaValue,
    ) -> Self {
        Self {
            meta: ObjectMeta::default(),
            data: ArcData::new(center, start_angle, end_angle),
            radius1,
            radius2,
            rotation_angle,
        }
    }

    #[must_use]
    pub fn data(&self) -> &ArcData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ArcData {
        &mut self.data
    }

    #[must_use]
    pub fn center(&self) -> &PatternPoint {
        self.data.center()
    }

    #[must_use]
    pub fn radius1(&self) -> f64 {
        self.radius1.value()
    }

    #[must_use]
    pub fn radius2(&self) -> f64 {
        self.radius2.value()
    }

    #[must_use]
    pub fn rotation_angle(&self) -> f64 {
        self.rotation_angle.value()
    }

    /// Swept parametric angle in `[0, 360]`, degrees.
    #[must_use]
    pub fn angle_arc(&self) -> f64 {
        self.data.angle_arc()
    }

    /// Point on the ellipse at the given parametric angle, degrees.
    #[must_use]
    pub fn point_at_param(&self, angle_deg: f64) -> Point2 {
        let c = self.center().to_point2();
        let rad = angle_deg.to_radians();
        let rot = self.rotation_angle().to_radians();
        let (rot_sin, rot_cos) = rot.sin_cos();
        let ex = self.radius1() * rad.cos();
        let ey = self.radius2() * rad.sin();
        Point2::new(
            c.x + ex * rot_cos - ey * rot_sin,
            c.y + ex * rot_sin + ey * rot_cos,
        )
    }

    fn is_degenerate(&self) -> bool {
        self.radius1().abs() < TOLERANCE || self.radius2().abs() < TOLERANCE
    }

    /// Splits the arc at the point reached after travelling `length`
    /// along the curve.
    ///
    /// The cut parameter is recovered by walking the tessellation; both
    /// halves share the exact cut angle and preserve flip, rotation and
    /// approximation scale.
    ///
    /// # Errors
    ///
    /// As for [`super::Arc::cut`]: short curves and out-of-range lengths
    /// follow the [`CutPolicy`].
    pub fn cut(&self, length: f64, policy: CutPolicy, label: &str) -> Result<(Point2, Self, Self)> {
        let total = self.length().abs();
        let len = clamp_cut_length(length.abs(), total, policy, self.meta.name())?;

        let points = self.get_points();
        let sweep = self.data.signed_sweep();
        #[allow(clippy::cast_precision_loss)]
        let segments = (points.len().saturating_sub(1)).max(1) as f64;

        let mut remaining = len;
        let mut cut_param = self.data.end_angle().value();
        for (i, pair) in points.windows(2).enumerate() {
            let chord = distance(&pair[0], &pair[1]);
            if chord >= remaining && chord > TOLERANCE {
                #[allow(clippy::cast_precision_loss)]
                let frac = (i as f64 + remaining / chord) / segments;
                cut_param = self.data.start_angle().value() + sweep * frac;
                break;
            }
            remaining -= chord;
        }
        let cut_angle = FormulaValue::from_value(normalize_angle_deg(cut_param));

        let mut first = Self::with_formulas(
            self.center().clone(),
            self.radius1.clone(),
            self.radius2.clone(),
            self.data.start_angle().clone(),
            cut_angle.clone(),
            self.rotation_angle.clone(),
        );
        let mut second = Self::with_formulas(
            self.center().clone(),
            self.radius1.clone(),
            self.radius2.clone(),
            cut_angle.clone(),
            self.data.end_angle().clone(),
            self.rotation_angle.clone(),
        );
        for (i, arc) in [&mut first, &mut second].into_iter().enumerate() {
            arc.data.set_flipped(self.data.is_flipped());
            arc.data.set_allow_empty_arc(self.data.allow_empty_arc());
            arc.meta
                .set_approximation_scale(self.meta.approximation_scale());
            if !label.is_empty() {
                arc.meta.set_name(format!("{label}_{}", i + 1));
            }
        }

        let point = self.point_at_param(cut_angle.value());
        Ok((point, first, second))
    }

    /// Copy travelling in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut rev = self.clone();
        rev.data.set_start_angle(self.data.end_angle().clone());
        rev.data.set_end_angle(self.data.start_angle().clone());
        rev.data.set_flipped(!self.data.is_flipped());
        rev
    }

    /// Rotated copy; radii, sweep and direction are untouched.
    #[must_use]
    pub fn rotate(&self, origin: &Point2, degrees: f64, suffix: &str) -> Self {
        let mut rotated = self.clone();
        rotated.data.set_center(self.center().rotate(origin, degrees, ""));
        rotated.rotation_angle = FormulaValue::from_value(normalize_angle_deg(
            self.rotation_angle() + degrees,
        ));
        rotated.suffix_name(suffix);
        rotated
    }

    /// Mirrored copy; sweep preserved, travel direction inverted.
    #[must_use]
    pub fn flip(&self, axis_p1: &Point2, axis_p2: &Point2, suffix: &str) -> Self {
        let m = reflection_matrix(axis_p1, axis_p2);
        let axis_angle = line_angle_deg(axis_p1, axis_p2);

        let mut flipped = self.clone();
        flipped.data.set_center(PatternPoint::from_point2(&apply(
            &m,
            &self.center().to_point2(),
        )));
        // Mirroring maps the parametric angle t to −t and reflects the
        // ellipse orientation.
        flipped.rotation_angle = FormulaValue::from_value(normalize_angle_deg(
            2.0 * axis_angle - self.rotation_angle(),
        ));
        flipped.data.set_start_angle(FormulaValue::from_value(
            normalize_angle_deg(-self.data.start_angle().value()),
        ));
        flipped.data.set_end_angle(FormulaValue::from_value(
            normalize_angle_deg(-self.data.end_angle().value()),
        ));
        flipped.data.set_flipped(!self.data.is_flipped());
        flipped.suffix_name(suffix);
        flipped
    }

    /// Translated copy.
    #[must_use]
    pub fn move_by(&self, distance: f64, angle_deg: f64, suffix: &str) -> Self {
        let mut moved = self.clone();
        moved
            .data
            .set_center(self.center().move_by(distance, angle_deg, ""));
        moved.suffix_name(suffix);
        moved
    }

    fn suffix_name(&mut self, suffix: &str) {
        if !suffix.is_empty() {
            let name = format!("{}{}", self.meta.name(), suffix);
            self.meta.set_name(name);
        }
    }

    fn tangent_angle_at_param(&self, angle_deg: f64) -> f64 {
        let rad = angle_deg.to_radians();
        let dx = -self.radius1() * rad.sin();
        let dy = self.radius2() * rad.cos();
        let base = dy.atan2(dx).to_degrees() + self.rotation_angle();
        if self.data.is_flipped() {
            normalize_angle_deg(base + 180.0)
        } else {
            normalize_angle_deg(base)
        }
    }
}

impl Curve for EllipticalArc {
    fn kind(&self) -> ObjectKind {
        ObjectKind::EllipticalArc
    }

    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    fn get_points(&self) -> Vec<Point2> {
        let center = self.center().to_point2();
        let scale = self.meta.approximation_scale();
        if self.is_degenerate() {
            return sample_arc(&center, mm_to_units(DEGENERATE_MARKER_MM), 0.0, 360.0, scale);
        }
        sample_ellipse_arc(
            &center,
            self.radius1(),
            self.radius2(),
            self.rotation_angle(),
            self.data.start_angle().value(),
            self.data.signed_sweep(),
            scale,
        )
    }

    fn length(&self) -> f64 {
        let points = self.get_points();
        let len: f64 = points.windows(2).map(|p| distance(&p[0], &p[1])).sum();
        if self.data.is_flipped() {
            -len
        } else {
            len
        }
    }

    fn start_angle(&self) -> f64 {
        self.tangent_angle_at_param(self.data.start_angle().value())
    }

    fn end_angle(&self) -> f64 {
        self.tangent_angle_at_param(self.data.end_angle().value())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn circular_ellipse_length_matches_circle() {
        let e = EllipticalArc::new(PatternPoint::new(0.0, 0.0), 100.0, 100.0, 0.0, 180.0, 0.0);
        assert_relative_eq!(e.length(), PI * 100.0, max_relative = 1e-3);
    }

    #[test]
    fn points_satisfy_rotated_ellipse_equation() {
        let e = EllipticalArc::new(PatternPoint::new(3.0, -2.0), 50.0, 20.0, 0.0, 360.0, 30.0);
        let c = e.center().to_point2();
        let rot = 30.0_f64.to_radians();
        for p in e.get_points() {
            // Undo the rotation, then check the canonical equation.
            let dx = p.x - c.x;
            let dy = p.y - c.y;
            let ex = dx * rot.cos() + dy * rot.sin();
            let ey = -dx * rot.sin() + dy * rot.cos();
            let v = (ex / 50.0).powi(2) + (ey / 20.0).powi(2);
            assert_relative_eq!(v, 1.0, max_relative = 1e-9);
        }
    }

    #[test]
    fn cut_halves_share_parameter_and_length() {
        let e = EllipticalArc::new(PatternPoint::new(0.0, 0.0), 100.0, 60.0, 0.0, 180.0, 0.0);
        let total = e.length();
        let (point, first, second) = e.cut(total / 3.0, CutPolicy::Pedantic, "E").unwrap();

        assert_eq!(
            first.data().end_angle().value().to_bits(),
            second.data().start_angle().value().to_bits()
        );
        assert_relative_eq!(first.length() + second.length(), total, max_relative = 1e-3);
        assert_relative_eq!(first.length(), total / 3.0, max_relative = 1e-2);
        assert!(e.is_point_on_curve(&point));
    }

    #[test]
    fn flip_preserves_sweep_and_negates_length() {
        let e = EllipticalArc::new(PatternPoint::new(0.0, 0.0), 50.0, 20.0, 10.0, 130.0, 15.0);
        let f = e.flip(&Point2::new(0.0, 0.0), &Point2::new(1.0, 0.0), "m");
        assert!(f.data().is_flipped());
        assert_relative_eq!(f.angle_arc(), e.angle_arc(), max_relative = 1e-9);
        assert_relative_eq!(f.length(), -e.length(), max_relative = 1e-6);
    }

    #[test]
    fn rotate_preserves_length() {
        let e = EllipticalArc::new(PatternPoint::new(0.0, 0.0), 50.0, 20.0, 10.0, 130.0, 15.0);
        let r = e.rotate(&Point2::new(10.0, 10.0), 77.0, "r");
        assert_relative_eq!(r.length(), e.length(), max_relative = 1e-9);
        assert_relative_eq!(r.rotation_angle(), 92.0, max_relative = 1e-9);
    }

    #[test]
    fn degenerate_radius_renders_marker() {
        let e = EllipticalArc::new(PatternPoint::new(1.0, 1.0), 0.0, 20.0, 0.0, 180.0, 0.0);
        let pts = e.get_points();
        assert!(pts.len() > 2);
        let c = e.center().to_point2();
        for p in &pts {
            assert_relative_eq!(
                distance(&c, p),
                mm_to_units(DEGENERATE_MARKER_MM),
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn tangent_angles_follow_travel_direction() {
        // Quarter of a circle-like ellipse, CCW from parametric 0.
        let e = EllipticalArc::new(PatternPoint::new(0.0, 0.0), 10.0, 10.0, 0.0, 90.0, 0.0);
        assert_relative_eq!(Curve::start_angle(&e), 90.0, max_relative = 1e-9);
        assert_relative_eq!(Curve::end_angle(&e), 180.0, max_relative = 1e-9);
    }
}
