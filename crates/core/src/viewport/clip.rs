//! Binary-search clipping of a level to a visible time window.

use std::ops::Range;

use crate::pyramid::Point;

/// Smallest index range of `points` covering `[x_min, x_max]`, padded by one
/// point on each side so lines reach the window edges.
///
/// `points` must be non-decreasing in `x`. Empty input yields `0..0`; a
/// window entirely outside the data yields a one-point boundary range.
pub fn clip_range(points: &[Point], x_min: f64, x_max: f64) -> Range<usize> {
    let len = points.len();
    if len == 0 {
        return 0..0;
    }

    let mut start = points.partition_point(|p| p.x < x_min);
    let mut end = start + points[start..].partition_point(|p| p.x <= x_max);

    if start > 0 {
        start -= 1;
    }
    if end < len {
        end += 1;
    }
    start..end
}
