//! Points and detail levels.

use serde::Serialize;

/// One plotted sample: time on x, value on y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A single resolution of one channel.
///
/// Points are non-decreasing in `x`. Level 0 holds one point per sample;
/// coarser levels hold a (min, max) pair per window of `window_size` samples.
#[derive(Debug, Clone)]
pub struct DetailLevel {
    pub window_size: usize,
    /// Seconds covered by one window.
    pub window_time: f64,
    pub points: Vec<Point>,
}

impl DetailLevel {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
