//! Error types for time-series partitioning.

use crate::frequency::Frequency;
use thiserror::Error;

/// Errors raised while planning timestamp windows.
#[derive(Error, Debug)]
pub enum PartitionError {
    /// Even the finest frequency cannot supply enough timestamps.
    #[error(
        "Not enough timestamps: {available} available at frequency '{frequency}' but {needed} needed; \
         widen the date range or choose a finer frequency"
    )]
    InsufficientTimestampRange {
        needed: u64,
        available: u64,
        frequency: Frequency,
    },

    /// Re-expanding the first window did not give one chunk of timestamps.
    #[error("First timestamp window expands to {actual} timestamps but chunks hold {expected}")]
    PartitionConsistency { expected: u64, actual: u64 },

    #[error("Unsupported frequency '{0}'; expected one of B, D, h, min, s, ms")]
    UnsupportedFrequency(String),

    #[error("Unsupported timestamp format '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid date range: {0}")]
    InvalidDate(String),

    #[error("Invalid sizing: {0}")]
    InvalidSizing(String),
}
