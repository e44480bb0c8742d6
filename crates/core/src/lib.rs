//! Multi-resolution min/max index for interactive plotting of long sample
//! sequences.
//!
//! Decoded audio is split into channels ([`audio::SampleStore`]), each channel
//! is summarized into a pyramid of detail levels ([`pyramid::SummaryPyramid`]),
//! and a [`viewport::ViewportIndexer`] picks the level and index range to draw
//! for the visible time window.

pub mod audio;
pub mod config;
pub mod error;
pub mod pyramid;
pub mod session;
pub mod traces;
pub mod viewport;

use std::path::Path;

use anyhow::{Context, Result};

use crate::audio::{decode_file, SampleStore};
use crate::config::PlotConfig;
use crate::traces::TraceSet;

/// Decode a file and build a trace for each of its channels.
///
/// The sample store is dropped once the pyramids are built.
pub fn load_traces(path: &Path, config: &PlotConfig) -> Result<TraceSet> {
    let decoded = decode_file(path)?;
    let store = SampleStore::from_decoded(&decoded)
        .with_context(|| format!("Unable to load file: {}", path.display()))?;
    drop(decoded);
    let traces = TraceSet::build(&store, config)
        .with_context(|| format!("Failed to index {}", path.display()))?;
    Ok(traces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_traces_from_wav() {
        let dir = std::env::temp_dir().join("audioplot_test_lib");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("three_channels.wav");

        let spec = hound::WavSpec {
            channels: 3,
            sample_rate: 1000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..5000i32 {
            writer.write_sample((i % 100) as i16).unwrap();
            writer.write_sample(0i16).unwrap();
            writer.write_sample(-((i % 100) as i16)).unwrap();
        }
        writer.finalize().unwrap();

        let traces = load_traces(&path, &PlotConfig::default()).unwrap();
        assert_eq!(traces.num_traces(), 3);
        assert_eq!(traces.num_samples(), 5000);
        assert_eq!(traces.sample_rate(), 1000);
        assert_eq!(traces.trace(0).unwrap().name, "Channel 1");
        // Too short for any summary level at the default threshold
        assert_eq!(traces.num_levels(), 1);
        assert_eq!(traces.num_points(0), 5000);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_traces_missing_file_fails() {
        let path = std::env::temp_dir().join("audioplot_test_lib_missing.wav");
        assert!(load_traces(&path, &PlotConfig::default()).is_err());
    }
}
