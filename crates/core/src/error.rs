//! Error types for pyramid construction and configuration.

use thiserror::Error;

/// Convenience alias for engine results.
pub type PlotResult<T> = Result<T, PlotError>;

/// Errors raised while building the summary index.
///
/// Viewport queries never produce these; they degrade to empty or
/// boundary ranges instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    /// Zero channels or zero samples were supplied.
    #[error("No samples to plot: {0}")]
    EmptyInput(String),

    /// Channels of one load have differing lengths.
    #[error("Channel {channel} has {actual} samples, expected {expected}")]
    ChannelLengthMismatch {
        channel: usize,
        expected: usize,
        actual: usize,
    },

    /// More channels than the visibility mask can address.
    #[error("{count} channels exceed the limit of {max} traces")]
    TooManyChannels { count: usize, max: usize },

    /// Sample period must be finite and positive.
    #[error("Invalid sample period: {0}")]
    InvalidSamplePeriod(f64),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
