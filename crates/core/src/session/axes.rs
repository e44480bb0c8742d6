//! Axis limits, plot modes and the spread layout.

use serde::Serialize;

/// Visible time window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct XAxis {
    pub min: f64,
    pub max: f64,
}

impl XAxis {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Shrink (positive `fraction`) or grow (negative) both ends by
    /// `fraction` of the current span.
    pub fn zoom(&mut self, fraction: f64) {
        let delta = fraction * self.span();
        self.min += delta;
        self.max -= delta;
    }

    /// Shift right (positive `fraction`) or left by `fraction` of the span.
    pub fn pan(&mut self, fraction: f64) {
        let delta = fraction * self.span();
        self.min += delta;
        self.max += delta;
    }
}

/// Vertical magnification.
///
/// Zoom level `n` shows `±base^-n`; fitting sets an exact half-range and
/// snaps the level to the nearest step so later zooms continue from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YAxis {
    pub zoom_level: i32,
    pub half_range: f64,
}

impl Default for YAxis {
    fn default() -> Self {
        Self {
            zoom_level: 0,
            half_range: 1.0,
        }
    }
}

impl YAxis {
    pub fn zoom_by(&mut self, steps: i32, base: f64) {
        self.zoom_level += steps;
        self.half_range = half_range_for_zoom_level(self.zoom_level, base);
    }

    pub fn fit(&mut self, max_abs: f64, margin: f64, base: f64) {
        if !(max_abs.is_finite() && max_abs > 0.0) {
            return;
        }
        self.half_range = max_abs * margin;
        self.zoom_level = zoom_level_for_half_range(self.half_range, base);
    }

    /// Magnification relative to the unit range.
    pub fn gain(&self) -> f64 {
        1.0 / self.half_range
    }

    pub fn limits(&self) -> (f64, f64) {
        (-self.half_range, self.half_range)
    }
}

pub fn half_range_for_zoom_level(level: i32, base: f64) -> f64 {
    base.powi(-level)
}

/// Nearest zoom level whose half-range matches `half_range`.
pub fn zoom_level_for_half_range(half_range: f64, base: f64) -> i32 {
    (-half_range.ln() / base.ln()).round() as i32
}

/// How traces share the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlotMode {
    /// All traces overlaid on one axis.
    Combined,
    /// Traces stacked in horizontal lanes of one plot.
    Spread,
    /// One subplot per visible trace, X linked.
    Multiple,
}

impl PlotMode {
    pub fn initial(num_traces: usize, spread_max_traces: usize) -> Self {
        if num_traces > spread_max_traces {
            PlotMode::Combined
        } else {
            PlotMode::Spread
        }
    }

    pub fn next(self) -> Self {
        match self {
            PlotMode::Combined => PlotMode::Spread,
            PlotMode::Spread => PlotMode::Multiple,
            PlotMode::Multiple => PlotMode::Combined,
        }
    }
}

/// Maps a trace value into its lane of a [-1, 1] spread plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpreadTransform {
    pub scale: f64,
    pub offset: f64,
}

impl SpreadTransform {
    /// Lane `slot` of `lanes`, top lane first.
    pub fn for_lane(slot: usize, lanes: usize, gain: f64) -> Self {
        let lanes = lanes.max(1) as f64;
        Self {
            scale: gain / lanes,
            offset: 1.0 - (slot as f64 + 0.5) * (2.0 / lanes),
        }
    }

    pub fn apply(&self, y: f64) -> f64 {
        y * self.scale + self.offset
    }
}
