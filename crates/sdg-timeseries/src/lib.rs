//! Time-series support for synthetic datasets.
//!
//! When documents must carry evenly spread timestamps, the
//! [`TimeSeriesPartitioner`] turns a date range and frequency into disjoint
//! [`TimestampWindow`]s, one per generated chunk. Each chunk then expands its
//! window with [`generate_timestamps_from_window`] and stamps its documents in
//! order.
//!
//! ```text
//! TimeseriesConfig ──► TimeSeriesPartitioner ──► Windows ──► chunk N
//!   (range, freq)        (refine frequency,        │           │
//!                         check first window)      ▼           ▼
//!                                            TimestampWindow ► WindowTimestamps
//! ```

pub mod error;
pub mod frequency;
pub mod partitioner;

pub use error::PartitionError;
pub use frequency::{Frequency, TimestampGrid};
pub use partitioner::{
    generate_timestamps_from_window, TimeSeriesPartitioner, TimestampWindow, WindowTimestamps,
    Windows,
};
