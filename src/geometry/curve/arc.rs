//! Circular arcs.

use crate::error::Result;
use crate::math::transform_2d::{apply, reflection_matrix};
use crate::math::{
    angle_between_deg, fuzzy_equal, line_angle_deg, mm_to_units, normalize_angle_deg, Point2,
    TOLERANCE,
};
use crate::tessellation::sample_arc;

use super::super::{FormulaValue, ObjectKind, ObjectMeta, PatternPoint};
use super::{clamp_cut_length, Curve, CutPolicy};

/// Radius of the marker drawn for a degenerate (center-only) arc, mm.
const DEGENERATE_MARKER_MM: f64 = 0.5;

/// Bookkeeping shared by circular and elliptical arcs.
///
/// The two boundary angles are polar angles of the boundary points as
/// seen from the center, in degrees. `is_flipped` records that the arc
/// was produced by a mirroring operation and travels clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcData {
    center: PatternPoint,
    start_angle: FormulaValue,
    end_angle: FormulaValue,
    is_flipped: bool,
    allow_empty_arc: bool,
}

impl ArcData {
    #[must_use]
    pub fn new(center: PatternPoint, start_angle: FormulaValue, end_angle: FormulaValue) -> Self {
        Self {
            center,
            start_angle,
            end_angle,
            is_flipped: false,
            allow_empty_arc: false,
        }
    }

    #[must_use]
    pub fn center(&self) -> &PatternPoint {
        &self.center
    }

    pub fn set_center(&mut self, center: PatternPoint) {
        self.center = center;
    }

    /// Polar angle of the start boundary, degrees.
    #[must_use]
    pub fn start_angle(&self) -> &FormulaValue {
        &self.start_angle
    }

    /// Polar angle of the end boundary, degrees.
    #[must_use]
    pub fn end_angle(&self) -> &FormulaValue {
        &self.end_angle
    }

    pub fn set_start_angle(&mut self, angle: FormulaValue) {
        self.start_angle = angle;
    }

    pub fn set_end_angle(&mut self, angle: FormulaValue) {
        self.end_angle = angle;
    }

    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    pub fn set_flipped(&mut self, flipped: bool) {
        self.is_flipped = flipped;
    }

    #[must_use]
    pub fn allow_empty_arc(&self) -> bool {
        self.allow_empty_arc
    }

    pub fn set_allow_empty_arc(&mut self, allow: bool) {
        self.allow_empty_arc = allow;
    }

    /// Swept angle in `[0, 360]`, degrees.
    ///
    /// A pure function of the boundary angles and the flipped flag. It
    /// is `0` only when the arc is allowed to be empty and the boundary
    /// angles coincide; otherwise a coincident pair means a full turn.
    #[must_use]
    pub fn angle_arc(&self) -> f64 {
        let start = normalize_angle_deg(self.start_angle.value());
        let end = normalize_angle_deg(self.end_angle.value());
        if fuzzy_equal(start, end) {
            return if self.allow_empty_arc { 0.0 } else { 360.0 };
        }
        let swept = angle_between_deg(start, end);
        if self.is_flipped {
            360.0 - swept
        } else {
            swept
        }
    }

    /// Signed sweep in travel direction: negative when flipped.
    #[must_use]
    pub fn signed_sweep(&self) -> f64 {
        if self.is_flipped {
            -self.angle_arc()
        } else {
            self.angle_arc()
        }
    }
}

/// A circular arc: center, radius and two boundary angles.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    meta: ObjectMeta,
    data: ArcData,
    radius: FormulaValue,
}

impl Arc {
    /// Builds an arc from plain numeric boundary angles, degrees.
    #[must_use]
    pub fn new(center: PatternPoint, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self::with_formulas(
            center,
            FormulaValue::from_value(radius),
            FormulaValue::from_value(start_angle),
            FormulaValue::from_value(end_angle),
        )
    }

    /// Builds an arc keeping the source formulas of its inputs.
    #[must_use]
    pub fn with_formulas(
        center: PatternPoint,
        radius: FormulaValue,
        start_angle: FormulaValue,
        end_angle: FormulaValue,
    ) -> Self {
        Self {
            meta: ObjectMeta::default(),
            data: ArcData::new(center, start_angle, end_angle),
            radius,
        }
    }

    /// Builds an arc from its start angle and arc length.
    ///
    /// The end angle is derived from the length; a negative length
    /// sweeps clockwise and marks the arc as flipped.
    #[must_use]
    pub fn from_length(center: PatternPoint, radius: f64, start_angle: f64, length: f64) -> Self {
        let sweep = if radius.abs() < TOLERANCE {
            0.0
        } else {
            length / (std::f64::consts::PI * radius / 180.0)
        };
        let end_angle = normalize_angle_deg(start_angle + sweep);
        let mut arc = Self::new(center, radius, start_angle, end_angle);
        arc.data.set_flipped(length < 0.0);
        arc
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
    pub fn radius(&self) -> f64 {
        self.radius.value()
    }

    #[must_use]
    pub fn radius_formula(&self) -> &FormulaValue {
        &self.radius
    }

    pub fn set_radius(&mut self, radius: FormulaValue) {
        self.radius = radius;
    }

    /// Swept angle in `[0, 360]`, degrees.
    #[must_use]
    pub fn angle_arc(&self) -> f64 {
        self.data.angle_arc()
    }

    /// Point on the circle at the given polar angle, degrees.
    #[must_use]
    pub fn point_at_angle(&self, angle_deg: f64) -> Point2 {
        let c = self.data.center().to_point2();
        let rad = angle_deg.to_radians();
        Point2::new(
            c.x + self.radius() * rad.cos(),
            c.y + self.radius() * rad.sin(),
        )
    }

    /// Splits the arc at the point reached after travelling `length`
    /// along the curve.
    ///
    /// Both halves preserve the flipped flag, the approximation scale
    /// and the empty-arc permission; the first half's end angle and the
    /// second half's start angle are the same value, exactly. The names
    /// of the halves are `{label}_1` / `{label}_2` when `label` is
    /// non-empty.
    ///
    /// # Errors
    ///
    /// [`crate::error::GeometryError::CurveTooShort`] or
    /// [`crate::error::GeometryError::SegmentLengthOutOfRange`] under
    /// [`CutPolicy::Pedantic`]; lenient mode warns and clamps instead.
    pub fn cut(&self, length: f64, policy: CutPolicy, label: &str) -> Result<(Point2, Self, Self)> {
        let total = self.length().abs();
        let len = clamp_cut_length(length.abs(), total, policy, self.meta.name())?;

        let dir = if self.data.is_flipped() { -1.0 } else { 1.0 };
        let sweep = if self.radius().abs() < TOLERANCE {
            0.0
        } else {
            len / (std::f64::consts::PI * self.radius() / 180.0)
        };
        let cut_angle = FormulaValue::from_value(normalize_angle_deg(
            self.data.start_angle().value() + dir * sweep,
        ));

        let mut first = Self::with_formulas(
            self.data.center().clone(),
            self.radius.clone(),
            self.data.start_angle().clone(),
            cut_angle.clone(),
        );
        let mut second = Self::with_formulas(
            self.data.center().clone(),
            self.radius.clone(),
            cut_angle.clone(),
            self.data.end_angle().clone(),
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

        let point = self.point_at_angle(cut_angle.value());
        Ok((point, first, second))
    }

    /// Copy travelling in the opposite direction: boundary angles swap
    /// and the flipped flag toggles, leaving the sweep unchanged.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut rev = self.clone();
        rev.data.set_start_angle(self.data.end_angle().clone());
        rev.data.set_end_angle(self.data.start_angle().clone());
        rev.data.set_flipped(!self.data.is_flipped());
        rev
    }

    /// Rotated copy; intrinsic metrics (radius, sweep, direction) are
    /// untouched.
    #[must_use]
    pub fn rotate(&self, origin: &Point2, degrees: f64, suffix: &str) -> Self {
        let mut rotated = self.clone();
        rotated.data.set_center(self.center().rotate(origin, degrees, ""));
        rotated.data.set_start_angle(FormulaValue::from_value(
            normalize_angle_deg(self.data.start_angle().value() + degrees),
        ));
        rotated.data.set_end_angle(FormulaValue::from_value(
            normalize_angle_deg(self.data.end_angle().value() + degrees),
        ));
        rotated.suffix_name(suffix);
        rotated
    }

    /// Mirrored copy. The sweep angle is preserved; the travel
    /// direction inverts, so the flipped flag toggles and the signed
    /// length changes sign.
    #[must_use]
    pub fn flip(&self, axis_p1: &Point2, axis_p2: &Point2, suffix: &str) -> Self {
        let m = reflection_matrix(axis_p1, axis_p2);
        let axis_angle = line_angle_deg(axis_p1, axis_p2);

        let mut flipped = self.clone();
        flipped.data.set_center(PatternPoint::from_point2(&apply(
            &m,
            &self.center().to_point2(),
        )));
        flipped.data.set_start_angle(FormulaValue::from_value(
            normalize_angle_deg(2.0 * axis_angle - self.data.start_angle().value()),
        ));
        flipped.data.set_end_angle(FormulaValue::from_value(
            normalize_angle_deg(2.0 * axis_angle - self.data.end_angle().value()),
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
}

impl Curve for Arc {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Arc
    }

    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    fn get_points(&self) -> Vec<Point2> {
        let center = self.data.center().to_point2();
        let scale = self.meta.approximation_scale();
        if self.radius().abs() < TOLERANCE {
            // Center-only arc: render as a small fixed-radius circle marker.
            return sample_arc(&center, mm_to_units(DEGENERATE_MARKER_MM), 0.0, 360.0, scale);
        }
        sample_arc(
            &center,
            self.radius(),
            self.data.start_angle().value(),
            self.data.signed_sweep(),
            scale,
        )
    }

    fn length(&self) -> f64 {
        let len = std::f64::consts::PI * self.radius() / 180.0 * self.data.angle_arc();
        if self.data.is_flipped() {
            -len
        } else {
            len
        }
    }

    fn start_angle(&self) -> f64 {
        let turn = if self.data.is_flipped() { -90.0 } else { 90.0 };
        normalize_angle_deg(self.data.start_angle().value() + turn)
    }

    fn end_angle(&self) -> f64 {
        let turn = if self.data.is_flipped() { -90.0 } else { 90.0 };
        normalize_angle_deg(self.data.end_angle().value() + turn)
    }
}
