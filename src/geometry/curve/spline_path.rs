//! Piecewise cubic Bezier paths.

use crate::error::{GeometryError, Result};
use crate::math::{
    distance, line_angle_deg, mm_to_units, normalize_angle_deg, point_at_angle, Point2, TOLERANCE,
};

use super::super::{FormulaValue, ObjectKind, ObjectMeta, PatternPoint};
use super::{clamp_cut_length, Curve, CutPolicy, Spline};

/// Outward nudge applied to a zero-length handle created by a cut, mm.
const HANDLE_NUDGE_MM: f64 = 0.1;

/// Which handle of a joint an edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointSide {
    /// The handle of the segment arriving at the joint.
    Incoming,
    /// The handle of the segment leaving the joint.
    Outgoing,
}

/// Handle bookkeeping for one on-curve node of a path.
///
/// Angles are directions from the node toward its neighbouring inner
/// control points, degrees; each keeps its source formula so joint
/// maintenance can tell a "freed" side (non-constant formula) from a
/// plain number.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JointHandles {
    pub angle_in: Option<FormulaValue>,
    pub length_in: Option<FormulaValue>,
    pub angle_out: Option<FormulaValue>,
    pub length_out: Option<FormulaValue>,
}

/// A chain of cubic Bezier segments sharing endpoints.
///
/// Stored as `4 + 3·(n−1)` raw control points for `n` segments: the
/// first four points form segment 1 and every further segment reuses
/// the previous last point plus three new points.
#[derive(Debug, Clone, PartialEq)]
pub struct SplinePath {
    meta: ObjectMeta,
    points: Vec<PatternPoint>,
    joints: Vec<JointHandles>,
}

impl SplinePath {
    /// Number of segments a control point list of `size` describes.
    #[must_use]
    pub fn segment_count_for(size: usize) -> usize {
        if size < 4 {
            0
        } else {
            (size - 4) / 3 + 1
        }
    }

    /// Number of control points needed for `segments` segments.
    #[must_use]
    pub fn control_points_for(segments: usize) -> usize {
        if segments == 0 {
            0
        } else {
            4 + 3 * (segments - 1)
        }
    }

    /// Index of the first control point of 0-based segment `i`.
    #[must_use]
    pub fn segment_offset(i: usize) -> usize {
        i * 3
    }

    /// Builds a path from a raw control point list.
    ///
    /// # Errors
    ///
    /// [`GeometryError::Degenerate`] when the list is shorter than four
    /// points or its size does not describe a whole number of segments.
    pub fn from_control_points(points: Vec<PatternPoint>) -> Result<Self> {
        let n = Self::segment_count_for(points.len());
        if n == 0 || Self::control_points_for(n) != points.len() {
            return Err(GeometryError::Degenerate(format!(
                "a spline path needs 4 + 3(n-1) control points, got {}",
                points.len()
            ))
            .into());
        }
        let joints = Self::derive_joints(&points);
        Ok(Self {
            meta: ObjectMeta::default(),
            points,
            joints,
        })
    }

    fn derive_joints(points: &[PatternPoint]) -> Vec<JointHandles> {
        let nodes = Self::segment_count_for(points.len()) + 1;
        let mut joints = Vec::with_capacity(nodes);
        for j in 0..nodes {
            let node = points[j * 3].to_point2();
            let mut handles = JointHandles::default();
            if j > 0 {
                let inner = points[j * 3 - 1].to_point2();
                handles.angle_in = Some(FormulaValue::from_value(line_angle_deg(&node, &inner)));
                handles.length_in = Some(FormulaValue::from_value(distance(&node, &inner)));
            }
            if j + 1 < nodes {
                let inner = points[j * 3 + 1].to_point2();
                handles.angle_out = Some(FormulaValue::from_value(line_angle_deg(&node, &inner)));
                handles.length_out = Some(FormulaValue::from_value(distance(&node, &inner)));
            }
            joints.push(handles);
        }
        joints
    }

    /// Appends one segment: two inner control points and the new node.
    pub fn push_segment(&mut self, c1: &Point2, c2: &Point2, node: PatternPoint) {
        self.points.push(PatternPoint::from_point2(c1));
        self.points.push(PatternPoint::from_point2(c2));
        self.points.push(node);
        self.joints = Self::derive_joints(&self.points);
    }

    #[must_use]
    pub fn control_points(&self) -> &[PatternPoint] {
        &self.points
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        Self::segment_count_for(self.points.len())
    }

    #[must_use]
    pub fn joints(&self) -> &[JointHandles] {
        &self.joints
    }

    /// The 0-based `i`-th segment as a standalone [`Spline`].
    #[must_use]
    pub fn segment(&self, i: usize) -> Option<Spline> {
        if i >= self.segment_count() {
            return None;
        }
        let off = Self::segment_offset(i);
        let mut seg = Spline::from_points(
            self.points[off].clone(),
            &self.points[off + 1].to_point2(),
            &self.points[off + 2].to_point2(),
            self.points[off + 3].clone(),
        );
        seg.meta_mut()
            .set_approximation_scale(self.meta.approximation_scale());
        Some(seg)
    }

    /// Which segment's parameterization contains `point`, if any.
    #[must_use]
    pub fn segment_containing(&self, point: &Point2) -> Option<usize> {
        (0..self.segment_count())
            .find(|&i| self.segment(i).is_some_and(|s| s.parameter_of_point(point).is_some()))
    }

    /// Splits the path at the point reached after travelling `length`.
    ///
    /// The containing segment is located by running length
    /// accumulation and cut there; the result is the cut point plus the
    /// control point tuples of the two path fragments. Zero-length
    /// handles created next to the cut are nudged 0.1 mm outward along
    /// the adjacent tangent so downstream tessellation never sees a
    /// degenerate handle.
    ///
    /// # Errors
    ///
    /// Short paths and out-of-range lengths follow the [`CutPolicy`].
    pub fn cut(
        &self,
        length: f64,
        policy: CutPolicy,
    ) -> Result<(Point2, Vec<PatternPoint>, Vec<PatternPoint>)> {
        let total = self.length();
        let len = clamp_cut_length(length, total, policy, self.meta.name())?;

        // Locate the containing segment.
        let mut acc = 0.0;
        let mut index = self.segment_count().saturating_sub(1);
        let mut local = len;
        for i in 0..self.segment_count() {
            let seg_len = self.segment(i).map_or(0.0, |s| s.length());
            if acc + seg_len >= len {
                index = i;
                local = len - acc;
                break;
            }
            acc += seg_len;
        }

        let segment = self
            .segment(index)
            .ok_or_else(|| GeometryError::Degenerate("spline path has no segments".into()))?;
        // The local length is re-clamped leniently inside the segment so
        // a cut landing on a node still produces two usable halves.
        let (cut_point, first_half, second_half) = segment.cut(local, CutPolicy::Lenient)?;

        let off = Self::segment_offset(index);
        let mut first: Vec<PatternPoint> = self.points[..off].to_vec();
        let mut fh = first_half.control_points();
        let mut sh = second_half.control_points();
        fix_degenerate_handles(&mut fh);
        fix_degenerate_handles(&mut sh);
        first.extend(fh.iter().map(PatternPoint::from_point2));

        let mut second: Vec<PatternPoint> = sh.iter().map(PatternPoint::from_point2).collect();
        second.extend_from_slice(&self.points[off + 4..]);

        Ok((cut_point, first, second))
    }

    /// Re-aims one handle of a joint and maintains the antiparallel
    /// invariant on the opposite side.
    ///
    /// The opposite handle follows (is set 180° apart, keeping its
    /// length) only while its angle formula is a plain number; a side
    /// freed with a non-constant formula is left alone.
    ///
    /// # Errors
    ///
    /// [`GeometryError::Degenerate`] when the joint has no handle on
    /// the requested side (first joint incoming, last joint outgoing,
    /// or an out-of-range index).
    pub fn update_joint(
        &mut self,
        joint: usize,
        side: JointSide,
        angle: FormulaValue,
    ) -> Result<()> {
        let nodes = self.segment_count() + 1;
        if joint >= nodes {
            return Err(
                GeometryError::Degenerate(format!("joint {joint} out of range")).into(),
            );
        }
        let node = self.points[joint * 3].to_point2();

        let missing = match side {
            JointSide::Incoming => joint == 0,
            JointSide::Outgoing => joint + 1 == nodes,
        };
        if missing {
            return Err(GeometryError::Degenerate(format!(
                "joint {joint} has no {side:?} handle"
            ))
            .into());
        }

        match side {
            JointSide::Incoming => {
                let length = self.joints[joint]
                    .length_in
                    .as_ref()
                    .map_or(0.0, FormulaValue::value);
                self.points[joint * 3 - 1] =
                    PatternPoint::from_point2(&point_at_angle(&node, length, angle.value()));
                self.joints[joint].angle_in = Some(angle.clone());

                let follows = self.joints[joint]
                    .angle_out
                    .as_ref()
                    .is_some_and(FormulaValue::is_constant);
                if follows {
                    let opposite = normalize_angle_deg(angle.value() + 180.0);
                    let out_len = self.joints[joint]
                        .length_out
                        .as_ref()
                        .map_or(0.0, FormulaValue::value);
                    self.points[joint * 3 + 1] =
                        PatternPoint::from_point2(&point_at_angle(&node, out_len, opposite));
                    self.joints[joint].angle_out = Some(FormulaValue::from_value(opposite));
                }
            }
            JointSide::Outgoing => {
                let length = self.joints[joint]
                    .length_out
                    .as_ref()
                    .map_or(0.0, FormulaValue::value);
                self.points[joint * 3 + 1] =
                    PatternPoint::from_point2(&point_at_angle(&node, length, angle.value()));
                self.joints[joint].angle_out = Some(angle.clone());

                let follows = self.joints[joint]
                    .angle_in
                    .as_ref()
                    .is_some_and(FormulaValue::is_constant);
                if follows && joint > 0 {
                    let opposite = normalize_angle_deg(angle.value() + 180.0);
                    let in_len = self.joints[joint]
                        .length_in
                        .as_ref()
                        .map_or(0.0, FormulaValue::value);
                    self.points[joint * 3 - 1] =
                        PatternPoint::from_point2(&point_at_angle(&node, in_len, opposite));
                    self.joints[joint].angle_in = Some(FormulaValue::from_value(opposite));
                }
            }
        }
        Ok(())
    }

    /// Whether a joint's two handles are antiparallel (180° apart).
    #[must_use]
    pub fn is_joint_smooth(&self, joint: usize) -> bool {
        let Some(handles) = self.joints.get(joint) else {
            return false;
        };
        match (&handles.angle_in, &handles.angle_out) {
            (Some(a_in), Some(a_out)) => {
                let delta = normalize_angle_deg(a_in.value() - a_out.value());
                (delta - 180.0).abs() < 1e-6
            }
            _ => true,
        }
    }

    /// Copy travelling in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        let joints = Self::derive_joints(&points);
        Self {
            meta: self.meta.clone(),
            points,
            joints,
        }
    }
}

/// Nudges degenerate inner handles of one segment's control points
/// outward along the adjacent tangent.
fn fix_degenerate_handles(cp: &mut [Point2; 4]) {
    let nudge = mm_to_units(HANDLE_NUDGE_MM);
    // Start handle: aim toward the first following distinct point.
    if distance(&cp[0], &cp[1]) < TOLERANCE {
        for target in [cp[2], cp[3]] {
            if distance(&cp[0], &target) > TOLERANCE {
                cp[1] = point_at_angle(&cp[0], nudge, line_angle_deg(&cp[0], &target));
                break;
            }
        }
    }
    // End handle: aim toward the first preceding distinct point.
    if distance(&cp[3], &cp[2]) < TOLERANCE {
        for target in [cp[1], cp[0]] {
            if distance(&cp[3], &target) > TOLERANCE {
                cp[2] = point_at_angle(&cp[3], nudge, line_angle_deg(&cp[3], &target));
                break;
            }
        }
    }
}

impl Curve for SplinePath {
    fn kind(&self) -> ObjectKind {
        ObjectKind::SplinePath
    }

    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    fn get_points(&self) -> Vec<Point2> {
        let mut points: Vec<Point2> = Vec::new();
        for i in 0..self.segment_count() {
            if let Some(seg) = self.segment(i) {
                let seg_points = seg.get_points();
                // The shared boundary point is not duplicated.
                let skip = usize::from(!points.is_empty());
                points.extend(seg_points.into_iter().skip(skip));
            }
        }
        points
    }

    fn length(&self) -> f64 {
        (0..self.segment_count())
            .filter_map(|i| self.segment(i))
            .map(|s| s.length())
            .sum()
    }

    fn start_angle(&self) -> f64 {
        self.segment(0).map_or(0.0, |s| s.start_angle())
    }

    fn end_angle(&self) -> f64 {
        self.segment(self.segment_count().saturating_sub(1))
            .map_or(0.0, |s| s.end_angle())
    }
}
