//! Per-channel sample storage with a shared uniform sample period.

use crate::error::{PlotError, PlotResult};

use super::decode::DecodedAudio;

/// Decoded samples split into channels, read-only after construction.
///
/// All channels have the same length and share `sample_period`.
#[derive(Debug, Clone)]
pub struct SampleStore {
    channels: Vec<Vec<f64>>,
    names: Vec<String>,
    sample_rate: u32,
    sample_period: f64,
}

impl SampleStore {
    /// Build a store from already separated channels.
    ///
    /// A sample rate of 0 is a degraded but valid input: the period falls
    /// back to 1.0 so times become sample counts.
    pub fn from_channels(channels: Vec<Vec<f64>>, sample_rate: u32) -> PlotResult<Self> {
        let first_len = match channels.first() {
            Some(c) => c.len(),
            None => return Err(PlotError::EmptyInput("no channels".into())),
        };
        if first_len == 0 {
            return Err(PlotError::EmptyInput("channels contain no samples".into()));
        }
        for (channel, samples) in channels.iter().enumerate() {
            if samples.len() != first_len {
                return Err(PlotError::ChannelLengthMismatch {
                    channel,
                    expected: first_len,
                    actual: samples.len(),
                });
            }
        }

        let sample_period = if sample_rate > 0 {
            1.0 / sample_rate as f64
        } else {
            log::warn!("Sample rate is 0; plotting against sample index instead of time");
            1.0
        };

        let names = (0..channels.len())
            .map(|c| format!("Channel {}", c + 1))
            .collect();

        Ok(Self {
            channels,
            names,
            sample_rate,
            sample_period,
        })
    }

    /// De-interleave decoder output into per-channel f64 sequences.
    pub fn from_interleaved(
        samples: &[f32],
        channel_count: u32,
        sample_rate: u32,
    ) -> PlotResult<Self> {
        let channel_count = channel_count as usize;
        if channel_count == 0 || samples.is_empty() {
            return Err(PlotError::EmptyInput(format!(
                "{} channels, {} samples",
                channel_count,
                samples.len()
            )));
        }

        let frames = samples.len() / channel_count;
        let channels = (0..channel_count)
            .map(|channel| {
                samples
                    .iter()
                    .skip(channel)
                    .step_by(channel_count)
                    .take(frames)
                    .map(|&v| v as f64)
                    .collect()
            })
            .collect();

        Self::from_channels(channels, sample_rate)
    }

    /// Convenience wrapper over [`SampleStore::from_interleaved`].
    pub fn from_decoded(decoded: &DecodedAudio) -> PlotResult<Self> {
        Self::from_interleaved(&decoded.samples, decoded.channels, decoded.sample_rate)
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn num_samples(&self) -> usize {
        self.channels[0].len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Seconds per sample (1.0 when the sample rate was 0).
    pub fn sample_period(&self) -> f64 {
        self.sample_period
    }

    pub fn time(&self, index: usize) -> f64 {
        index as f64 * self.sample_period
    }

    /// Time just past the last sample.
    pub fn max_time(&self) -> f64 {
        self.num_samples() as f64 * self.sample_period
    }

    /// Nearest sample index for a time; negative times map to 0.
    pub fn index_for_time(&self, time: f64) -> usize {
        index_for_time(time, self.sample_period)
    }

    /// Sample value, or 0.0 when the channel or index is out of range.
    pub fn value(&self, channel: usize, index: usize) -> f64 {
        self.channels
            .get(channel)
            .and_then(|c| c.get(index))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn channel(&self, channel: usize) -> Option<&[f64]> {
        self.channels.get(channel).map(|c| c.as_slice())
    }

    pub fn channel_name(&self, channel: usize) -> &str {
        self.names.get(channel).map(|s| s.as_str()).unwrap_or("")
    }
}

/// Round `time / period` to the nearest index, saturating at 0.
pub(crate) fn index_for_time(time: f64, period: f64) -> usize {
    let index = time / period + 0.5;
    if index.is_nan() || index <= 0.0 {
        0
    } else {
        index as usize
    }
}
