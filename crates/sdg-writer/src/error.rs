//! Error types for the dataset writer.

use sdg_generator::GenerationError;
use sdg_timeseries::PartitionError;
use thiserror::Error;

/// Errors that can occur while writing a dataset.
#[derive(Error, Debug)]
pub enum WriterError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A generator failed while building a chunk.
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Time-series window planning failed.
    #[error("Time-series partitioning failed: {0}")]
    Partition(#[from] PartitionError),

    /// Every timestamp window was consumed before the target size was reached.
    #[error("Ran out of timestamp windows after {windows} chunks")]
    WindowsExhausted { windows: u64 },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("Invalid writer option '{name}': {reason}")]
    InvalidOption { name: &'static str, reason: String },
}
