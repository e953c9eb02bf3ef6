mod offset_2d;
mod segment_2d;

pub use offset_2d::{
    is_simple, offset_spline, offset_spline_path, outline_spline, outline_spline_path,
    try_find_focal_point,
};
pub use segment_2d::{from_begin, segment_points, to_end};
