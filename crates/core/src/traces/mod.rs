//! Traces: one summary pyramid per channel, with a name and color.

pub mod colormap;
pub mod visibility;

pub use colormap::{Color, Colormap};
pub use visibility::{TraceStatus, TraceVisibility, VisibilityMode, MAX_TRACES};

use crate::audio::SampleStore;
use crate::config::PlotConfig;
use crate::error::{PlotError, PlotResult};
use crate::pyramid::{build_channel_pyramids, Point, SummaryPyramid};

/// One plotted channel.
#[derive(Debug, Clone)]
pub struct Trace {
    pub name: String,
    pub color: Color,
    pub pyramid: SummaryPyramid,
}

/// Every trace of one load plus the timing they share.
///
/// All pyramids have the same level geometry, so level-wide queries are
/// answered from trace 0.
#[derive(Debug, Clone)]
pub struct TraceSet {
    traces: Vec<Trace>,
    colormap: Colormap,
    sample_rate: u32,
    sample_period: f64,
    num_samples: usize,
}

impl TraceSet {
    /// Build pyramids for every channel of `store`.
    pub fn build(store: &SampleStore, config: &PlotConfig) -> PlotResult<Self> {
        let count = store.num_channels();
        if count > MAX_TRACES {
            return Err(PlotError::TooManyChannels {
                count,
                max: MAX_TRACES,
            });
        }

        let pyramids = build_channel_pyramids(store, config)?;
        let colormap = Colormap::default();
        let traces: Vec<Trace> = pyramids
            .into_iter()
            .enumerate()
            .map(|(i, pyramid)| Trace {
                name: store.channel_name(i).to_string(),
                color: colormap.color(i),
                pyramid,
            })
            .collect();

        log::info!(
            "Built {} trace(s), {} detail levels over {} samples",
            traces.len(),
            traces.first().map(|t| t.pyramid.num_levels()).unwrap_or(0),
            store.num_samples()
        );

        Ok(Self {
            traces,
            colormap,
            sample_rate: store.sample_rate(),
            sample_period: store.sample_period(),
            num_samples: store.num_samples(),
        })
    }

    pub fn num_traces(&self) -> usize {
        self.traces.len()
    }

    pub fn trace(&self, trace: usize) -> Option<&Trace> {
        self.traces.get(trace)
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    /// Pyramid used for level selection and estimates.
    pub fn reference(&self) -> Option<&SummaryPyramid> {
        self.traces.first().map(|t| &t.pyramid)
    }

    pub fn num_levels(&self) -> usize {
        self.reference().map(|p| p.num_levels()).unwrap_or(0)
    }

    pub fn num_points(&self, level: usize) -> usize {
        self.reference().map(|p| p.num_points(level)).unwrap_or(0)
    }

    /// Points of one trace at one level; empty when either is unknown.
    pub fn point_array(&self, trace: usize, level: usize) -> &[Point] {
        self.traces
            .get(trace)
            .map(|t| t.pyramid.points(level))
            .unwrap_or(&[])
    }

    /// Raw sample value of a trace, 0.0 when out of range.
    pub fn value(&self, trace: usize, frame: usize) -> f64 {
        self.point_array(trace, 0)
            .get(frame)
            .map(|p| p.y)
            .unwrap_or(0.0)
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn sample_period(&self) -> f64 {
        self.sample_period
    }

    pub fn time(&self, frame: usize) -> f64 {
        frame as f64 * self.sample_period
    }

    pub fn max_time(&self) -> f64 {
        self.num_samples as f64 * self.sample_period
    }

    pub fn colormap(&self) -> Colormap {
        self.colormap
    }

    /// Recolor every trace from `colormap`.
    pub fn set_colormap(&mut self, colormap: Colormap) {
        self.colormap = colormap;
        for (i, trace) in self.traces.iter_mut().enumerate() {
            trace.color = colormap.color(i);
        }
    }
}
