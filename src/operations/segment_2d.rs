//! Sub-range extraction from a tessellated curve.
//!
//! The piece/seam-allowance layer builds sewing-piece boundaries from
//! ranges of curve points between two points known to lie on the curve.

use crate::error::{OperationError, Result};
use crate::math::distance_2d::is_point_on_segment;
use crate::math::{points_equal, Point2, ACCURACY_POINT_ON_LINE};

/// Drops everything before `begin`, which must lie on the polyline.
///
/// The result starts exactly at `begin`. `None` when the point cannot
/// be located within the drafting accuracy.
#[must_use]
pub fn from_begin(points: &[Point2], begin: &Point2) -> Option<Vec<Point2>> {
    let first = points.first()?;
    if points_equal(first, begin) {
        let mut result = points.to_vec();
        result[0] = *begin;
        return Some(result);
    }
    for (i, pair) in points.windows(2).enumerate() {
        if is_point_on_segment(begin, &pair[0], &pair[1], ACCURACY_POINT_ON_LINE) {
            let mut result = Vec::with_capacity(points.len() - i);
            result.push(*begin);
            result.extend_from_slice(&points[i + 1..]);
            return Some(result);
        }
    }
    None
}

/// Drops everything after `end`, which must lie on the polyline.
///
/// The result ends exactly at `end`. `None` when the point cannot be
/// located within the drafting accuracy.
#[must_use]
pub fn to_end(points: &[Point2], end: &Point2) -> Option<Vec<Point2>> {
    let last = points.last()?;
    if points_equal(last, end) {
        let mut result = points.to_vec();
        let idx = result.len() - 1;
        result[idx] = *end;
        return Some(result);
    }
    for (i, pair) in points.windows(2).enumerate() {
        if is_point_on_segment(end, &pair[0], &pair[1], ACCURACY_POINT_ON_LINE) {
            let mut result = Vec::with_capacity(i + 2);
            result.extend_from_slice(&points[..=i]);
            result.push(*end);
            return Some(result);
        }
    }
    None
}

/// Extracts the tessellated points between `begin` and `end`.
///
/// Both points must lie on the curve within tolerance; the result runs
/// from `begin` to `end` in curve direction, or reversed when `reverse`
/// is set.
///
/// # Errors
///
/// [`OperationError::PointNotOnCurve`] naming the offending point when
/// either boundary cannot be located.
pub fn segment_points(
    points: &[Point2],
    begin: &Point2,
    end: &Point2,
    reverse: bool,
) -> Result<Vec<Point2>> {
    let tail = from_begin(points, begin).ok_or(OperationError::PointNotOnCurve {
        x: begin.x,
        y: begin.y,
    })?;
    let mut segment = to_end(&tail, end).ok_or(OperationError::PointNotOnCurve {
        x: end.x,
        y: end.y,
    })?;
    if reverse {
        segment.reverse();
    }
    Ok(segment)
}
