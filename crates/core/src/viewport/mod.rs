//! Viewport indexing: which level to draw and which points of it are visible.

pub mod clip;
pub mod select;

pub use clip::clip_range;
pub use select::{estimate_visible_points, select_level};

use std::ops::Range;

use crate::pyramid::{Point, SummaryPyramid};

/// Per-viewport selection state.
///
/// Holds no data, only the current level and visible window. Update it on
/// every viewport change, then slice any pyramid with the same geometry.
#[derive(Debug, Clone)]
pub struct ViewportIndexer {
    budget: usize,
    level: usize,
    x_min: f64,
    x_max: f64,
    range: Range<usize>,
    visible_points: usize,
}

impl ViewportIndexer {
    /// `budget` is the soft cap on visible points; levels switch at half of it.
    pub fn new(budget: usize) -> Self {
        Self {
            budget,
            level: 0,
            x_min: 0.0,
            x_max: 0.0,
            range: 0..0,
            visible_points: 0,
        }
    }

    /// Start selection from `level` instead of full resolution.
    pub fn starting_at(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    /// Re-select the level for `[x_min, x_max]` and clip `reference` to it.
    ///
    /// Returns true when the level changed.
    pub fn update(&mut self, reference: &SummaryPyramid, x_min: f64, x_max: f64) -> bool {
        let span = (x_max - x_min).max(0.0);
        let previous = self.level;

        self.level = select_level(reference, self.level, span, self.budget);
        self.x_min = x_min;
        self.x_max = x_max;
        self.visible_points = estimate_visible_points(reference, self.level, span);
        self.range = clip_range(reference.points(self.level), x_min, x_max);

        if self.level != previous {
            log::debug!(
                "Detail level {} -> {} (window {}, ~{} points visible)",
                previous,
                self.level,
                reference.window_size(self.level).unwrap_or(1),
                self.visible_points
            );
        }
        self.level != previous
    }

    /// Drop back to full resolution, e.g. after a new load.
    pub fn reset(&mut self) {
        self.level = 0;
        self.range = 0..0;
        self.visible_points = 0;
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Visible index range into the reference pyramid's current level.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn visible_points(&self) -> usize {
        self.visible_points
    }

    /// Visible range of another channel's pyramid at the current level.
    ///
    /// Summary points sit at per-channel extremum times, so each channel is
    /// clipped with its own search rather than reusing the reference range.
    pub fn range_for(&self, pyramid: &SummaryPyramid) -> Range<usize> {
        clip_range(pyramid.points(self.level), self.x_min, self.x_max)
    }

    pub fn slice<'a>(&self, pyramid: &'a SummaryPyramid) -> &'a [Point] {
        let points = pyramid.points(self.level);
        &points[self.range_for(pyramid)]
    }
}
