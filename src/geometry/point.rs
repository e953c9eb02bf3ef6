//! A labelled 2D pattern point.

use crate::math::transform_2d::{apply, reflection_matrix, rotation_matrix};
use crate::math::{point_at_angle, Point2};

use super::{ObjectKind, ObjectMeta};

/// A 2D coordinate plus label-placement offsets.
///
/// The label offsets bias where the point's name is drawn relative to
/// the coordinate; transforms carry them over unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatternPoint {
    meta: ObjectMeta,
    x: f64,
    y: f64,
    label_offset_x: f64,
    label_offset_y: f64,
    show_label: bool,
}

impl PatternPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            meta: ObjectMeta::default(),
            x,
            y,
            label_offset_x: 0.0,
            label_offset_y: 0.0,
            show_label: true,
        }
    }

    #[must_use]
    pub fn from_point2(p: &Point2) -> Self {
        Self::new(p.x, p.y)
    }

    #[must_use]
    pub fn named(x: f64, y: f64, name: impl Into<String>) -> Self {
        let mut point = Self::new(x, y);
        point.meta.set_name(name);
        point
    }

    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Point
    }

    #[must_use]
    pub fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    #[must_use]
    pub fn to_point2(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    #[must_use]
    pub fn label_offset_x(&self) -> f64 {
        self.label_offset_x
    }

    #[must_use]
    pub fn label_offset_y(&self) -> f64 {
        self.label_offset_y
    }

    pub fn set_label_offset(&mut self, mx: f64, my: f64) {
        self.label_offset_x = mx;
        self.label_offset_y = my;
    }

    #[must_use]
    pub fn show_label(&self) -> bool {
        self.show_label
    }

    pub fn set_show_label(&mut self, show: bool) {
        self.show_label = show;
    }

    /// Rotates the point about `origin` by `degrees`, returning a copy
    /// with `suffix` appended to its name.
    #[must_use]
    pub fn rotate(&self, origin: &Point2, degrees: f64, suffix: &str) -> Self {
        let m = rotation_matrix(origin, degrees);
        self.transformed(&apply(&m, &self.to_point2()), suffix)
    }

    /// Mirrors the point across the axis through `axis_p1` and
    /// `axis_p2`, returning a copy with `suffix` appended to its name.
    #[must_use]
    pub fn flip(&self, axis_p1: &Point2, axis_p2: &Point2, suffix: &str) -> Self {
        let m = reflection_matrix(axis_p1, axis_p2);
        self.transformed(&apply(&m, &self.to_point2()), suffix)
    }

    /// Moves the point by `distance` at `angle_deg`, returning a copy
    /// with `suffix` appended to its name.
    #[must_use]
    pub fn move_by(&self, distance: f64, angle_deg: f64, suffix: &str) -> Self {
        let target = point_at_angle(&self.to_point2(), distance, angle_deg);
        self.transformed(&target, suffix)
    }

    fn transformed(&self, target: &Point2, suffix: &str) -> Self {
        let mut moved = self.clone();
        moved.x = target.x;
        moved.y = target.y;
        if !suffix.is_empty() {
            let name = format!("{}{}", self.meta.name(), suffix);
            moved.meta.set_name(name);
        }
        moved
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rotate_quarter_turn() {
        let p = PatternPoint::named(1.0, 0.0, "A");
        let r = p.rotate(&Point2::new(0.0, 0.0), 90.0, "a1");
        assert!(r.x().abs() < 1e-12);
        assert!((r.y() - 1.0).abs() < 1e-12);
        assert_eq!(r.meta().name(), "Aa1");
    }

    #[test]
    fn flip_across_vertical_axis() {
        let p = PatternPoint::named(3.0, 2.0, "B");
        let f = p.flip(&Point2::new(0.0, -1.0), &Point2::new(0.0, 1.0), "m");
        assert!((f.x() + 3.0).abs() < 1e-12);
        assert!((f.y() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn move_by_angle() {
        let p = PatternPoint::new(1.0, 1.0);
        let m = p.move_by(5.0, 180.0, "");
        assert!((m.x() + 4.0).abs() < 1e-12);
        assert!((m.y() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn label_data_survives_transforms() {
        let mut p = PatternPoint::named(1.0, 0.0, "C");
        p.set_label_offset(4.0, -2.0);
        p.set_show_label(false);
        let r = p.rotate(&Point2::new(0.0, 0.0), 45.0, "r");
        assert!((r.label_offset_x() - 4.0).abs() < 1e-12);
        assert!((r.label_offset_y() + 2.0).abs() < 1e-12);
        assert!(!r.show_label());
    }
}
