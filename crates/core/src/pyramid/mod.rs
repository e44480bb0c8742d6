//! Multi-resolution min/max summaries of a channel.

pub mod builder;
pub mod level;

pub use builder::{build_levels, window_size_for_level};
pub use level::{DetailLevel, Point};

use crate::audio::SampleStore;
use crate::config::PlotConfig;
use crate::error::PlotResult;

/// All detail levels of one channel, finest first.
///
/// Immutable after construction; level 0 always exists.
#[derive(Debug, Clone)]
pub struct SummaryPyramid {
    levels: Vec<DetailLevel>,
    num_samples: usize,
    sample_period: f64,
}

impl SummaryPyramid {
    pub fn build(samples: &[f64], sample_period: f64, config: &PlotConfig) -> PlotResult<Self> {
        let levels = build_levels(samples, sample_period, config)?;
        Ok(Self {
            levels,
            num_samples: samples.len(),
            sample_period,
        })
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, level: usize) -> Option<&DetailLevel> {
        self.levels.get(level)
    }

    pub fn levels(&self) -> &[DetailLevel] {
        &self.levels
    }

    /// Points of a level; empty when the level does not exist.
    pub fn points(&self, level: usize) -> &[Point] {
        self.levels
            .get(level)
            .map(|l| l.points.as_slice())
            .unwrap_or(&[])
    }

    pub fn num_points(&self, level: usize) -> usize {
        self.points(level).len()
    }

    pub fn window_size(&self, level: usize) -> Option<usize> {
        self.levels.get(level).map(|l| l.window_size)
    }

    pub fn coarsest(&self) -> &DetailLevel {
        // build_levels never returns an empty vector
        &self.levels[self.levels.len() - 1]
    }

    /// Raw samples summarized by this pyramid.
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn sample_period(&self) -> f64 {
        self.sample_period
    }
}

/// Build one pyramid per channel of `store`.
///
/// Channels are independent, so with the `parallel` feature each one is
/// built on its own rayon task; results keep channel order.
pub fn build_channel_pyramids(
    store: &SampleStore,
    config: &PlotConfig,
) -> PlotResult<Vec<SummaryPyramid>> {
    let build_one = |channel: usize| -> PlotResult<SummaryPyramid> {
        let samples = store.channel(channel).unwrap_or(&[]);
        let pyramid = SummaryPyramid::build(samples, store.sample_period(), config)?;
        log::debug!(
            "{}: {} levels, coarsest has {} points",
            store.channel_name(channel),
            pyramid.num_levels(),
            pyramid.coarsest().len()
        );
        Ok(pyramid)
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        (0..store.num_channels()).into_par_iter().map(build_one).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..store.num_channels()).map(build_one).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(n: usize, sample_rate: f64, freq: f64) -> Vec<f64> {
        (0..n)
            .map(|i| (std::f64::consts::TAU * freq * i as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_sine_round_trip_bounds_signal() {
        let config = PlotConfig::default();
        let samples = sine(1_000_000, 44100.0, 440.0);
        let pyramid = SummaryPyramid::build(&samples, 1.0 / 44100.0, &config).unwrap();

        assert!(pyramid.num_levels() > 1);
        assert!(pyramid.num_levels() <= config.max_detail_levels + 1);

        let top = pyramid.coarsest();
        assert!(top.len() < config.min_detail_level_points, "top has {} points", top.len());
        for p in &top.points {
            assert!(p.y >= -1.0 - 1e-9 && p.y <= 1.0 + 1e-9, "point {:?} out of range", p);
        }

        // The global extrema sit in some window and must survive.
        let max = top.points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        let min = top.points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        assert!(max > 0.99, "max={}", max);
        assert!(min < -0.99, "min={}", min);
    }

    #[test]
    fn test_accessors_out_of_range() {
        let pyramid = SummaryPyramid::build(&[0.0; 10], 1.0, &PlotConfig::default()).unwrap();
        assert_eq!(pyramid.num_levels(), 1);
        assert_eq!(pyramid.num_points(0), 10);
        assert!(pyramid.points(3).is_empty());
        assert_eq!(pyramid.window_size(0), Some(1));
        assert_eq!(pyramid.window_size(1), None);
        assert!(pyramid.level(1).is_none());
        assert_eq!(pyramid.num_samples(), 10);
    }

    #[test]
    fn test_channel_pyramids_keep_channel_order() {
        let left = vec![0.5; 5000];
        let right = vec![-0.5; 5000];
        let store = SampleStore::from_channels(vec![left, right], 1000).unwrap();
        let config = PlotConfig {
            min_detail_level_points: 256,
            ..Default::default()
        };

        let pyramids = build_channel_pyramids(&store, &config).unwrap();
        assert_eq!(pyramids.len(), 2);
        assert_eq!(pyramids[0].num_levels(), pyramids[1].num_levels());
        assert!(pyramids[0].coarsest().points.iter().all(|p| p.y == 0.5));
        assert!(pyramids[1].coarsest().points.iter().all(|p| p.y == -0.5));
    }
}
