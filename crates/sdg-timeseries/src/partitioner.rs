//! Timestamp window planning.
//!
//! The partitioner reconciles a requested data volume against a date range:
//! it refines the frequency until the timestamp grid can cover the expected
//! document count, then cuts the grid into one window per chunk. Windows are
//! disjoint, so chunks generated concurrently never share a timestamp.

use crate::error::PartitionError;
use crate::frequency::{Frequency, TimestampGrid};
use chrono::NaiveDateTime;
use sdg_core::{ConfigError, DateFormat, TimeseriesConfig};
use serde_json::Value;
use tracing::{debug, info};

/// Timestamps requested on top of the expected document count: one tenth more.
const BUFFER_DIVISOR: u64 = 10;

/// A contiguous `[start, end]` slice of the timestamp grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Plans timestamp windows for a time-series run.
#[derive(Debug, Clone)]
pub struct TimeSeriesPartitioner {
    start: NaiveDateTime,
    end: NaiveDateTime,
    frequency: Frequency,
    format: DateFormat,
    docs_per_chunk: u64,
    avg_document_size: u64,
    total_size_bytes: u64,
}

impl TimeSeriesPartitioner {
    /// Validate the time-series settings and sizing inputs.
    pub fn new(
        config: &TimeseriesConfig,
        docs_per_chunk: u64,
        avg_document_size: u64,
        total_size_bytes: u64,
    ) -> Result<Self, PartitionError> {
        let frequency: Frequency = config
            .frequency
            .parse()
            .map_err(PartitionError::UnsupportedFrequency)?;
        let format = config.date_format().map_err(from_config)?;
        let start = config.start().map_err(from_config)?;
        let end = config.end().map_err(from_config)?;
        if start > end {
            return Err(PartitionError::InvalidDate(format!(
                "start date {} is after end date {}",
                config.start_date, config.end_date
            )));
        }
        if docs_per_chunk == 0 {
            return Err(PartitionError::InvalidSizing(
                "docs per chunk must be at least 1".to_string(),
            ));
        }
        if avg_document_size == 0 {
            return Err(PartitionError::InvalidSizing(
                "average document size must be at least 1 byte".to_string(),
            ));
        }

        Ok(Self {
            start,
            end,
            frequency,
            format,
            docs_per_chunk,
            avg_document_size,
            total_size_bytes,
        })
    }

    /// Documents expected from the byte target, before the buffer.
    pub fn expected_documents(&self) -> u64 {
        self.total_size_bytes / self.avg_document_size
    }

    /// Timestamps the grid must provide: the buffered expected count, and at
    /// least one full chunk.
    pub fn required_timestamps(&self) -> u64 {
        let expected = self.expected_documents();
        let buffered = expected.saturating_add(expected.div_ceil(BUFFER_DIVISOR));
        buffered.max(self.docs_per_chunk)
    }

    /// Output format for window timestamps.
    pub fn format(&self) -> DateFormat {
        self.format
    }

    /// Pick a sufficient frequency and cut its grid into windows.
    pub fn generate_windows(&self) -> Result<Windows, PartitionError> {
        let needed = self.required_timestamps();
        let mut frequency = self.frequency;
        let mut grid = TimestampGrid::new(self.start, self.end, frequency);

        while grid.len() < needed {
            info!(
                "Frequency '{}' yields {} timestamps, {} needed; trying a finer frequency",
                frequency,
                grid.len(),
                needed
            );
            frequency = frequency
                .finer()
                .ok_or(PartitionError::InsufficientTimestampRange {
                    needed,
                    available: grid.len(),
                    frequency,
                })?;
            grid = TimestampGrid::new(self.start, self.end, frequency);
        }
        if frequency != self.frequency {
            info!("Using frequency '{}' ({} timestamps)", frequency, grid.len());
        }

        let windows = Windows {
            grid,
            docs_per_chunk: self.docs_per_chunk,
            next: 0,
        };

        let first = windows
            .window_at(0)
            .ok_or(PartitionError::PartitionConsistency {
                expected: self.docs_per_chunk,
                actual: 0,
            })?;
        let actual = TimestampGrid::new(first.start, first.end, frequency).len();
        if actual != self.docs_per_chunk {
            return Err(PartitionError::PartitionConsistency {
                expected: self.docs_per_chunk,
                actual,
            });
        }
        debug!(
            "First timestamp window {} .. {} holds {} timestamps; {} windows total",
            first.start,
            first.end,
            actual,
            windows.len()
        );

        Ok(windows)
    }
}

fn from_config(err: ConfigError) -> PartitionError {
    match err {
        ConfigError::UnsupportedFormat(format) => PartitionError::UnsupportedFormat(format),
        ConfigError::InvalidDate(date) => PartitionError::InvalidDate(date),
        other => PartitionError::InvalidDate(other.to_string()),
    }
}

/// Lazy sequence of windows over a timestamp grid.
#[derive(Debug, Clone)]
pub struct Windows {
    grid: TimestampGrid,
    docs_per_chunk: u64,
    next: u64,
}

impl Windows {
    /// Frequency the grid was built at.
    pub fn frequency(&self) -> Frequency {
        self.grid.frequency()
    }

    /// Number of timestamps in the whole grid.
    pub fn grid_len(&self) -> u64 {
        self.grid.len()
    }

    /// Total number of windows, regardless of how many were consumed.
    pub fn total(&self) -> u64 {
        self.grid.len().div_ceil(self.docs_per_chunk)
    }

    fn window_at(&self, index: u64) -> Option<TimestampWindow> {
        let first = index.checked_mul(self.docs_per_chunk)?;
        let last = first
            .saturating_add(self.docs_per_chunk - 1)
            .min(self.grid.len().checked_sub(1)?);
        Some(TimestampWindow {
            start: self.grid.nth(first)?,
            end: self.grid.nth(last)?,
        })
    }
}

impl Iterator for Windows {
    type Item = TimestampWindow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total() {
            return None;
        }
        let window = self.window_at(self.next)?;
        self.next += 1;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total().saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Windows {}

/// Timestamps of one window, rendered in the requested format.
///
/// Cloning or calling [`WindowTimestamps::iter`] again restarts from the
/// window's first timestamp.
#[derive(Debug, Clone, Copy)]
pub struct WindowTimestamps {
    grid: TimestampGrid,
    format: DateFormat,
}

impl WindowTimestamps {
    pub fn len(&self) -> u64 {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        self.grid.iter().map(move |ts| self.format.render(&ts))
    }
}

/// Expand `window` at `frequency` into formatted timestamps.
///
/// The format is checked before anything is produced.
pub fn generate_timestamps_from_window(
    window: &TimestampWindow,
    frequency: Frequency,
    format: &str,
) -> Result<WindowTimestamps, PartitionError> {
    let format = DateFormat::parse_timeseries(format)
        .ok_or_else(|| PartitionError::UnsupportedFormat(format.to_string()))?;
    Ok(WindowTimestamps {
        grid: TimestampGrid::new(window.start, window.end, frequency),
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use serde_json::json;

    fn config(start: &str, end: &str, frequency: &str) -> TimeseriesConfig {
        TimeseriesConfig {
            start_date: start.to_string(),
            end_date: end.to_string(),
            frequency: frequency.to_string(),
            ..TimeseriesConfig::for_field("@timestamp")
        }
    }

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_hundred_thousand_timestamps_make_ten_windows() {
        // 2019-01-01T00:00:00 + 99,999 seconds: exactly 100,000 timestamps.
        let config = config("2019-01-01T00:00:00", "2019-01-02T03:46:39", "s");
        // 90,000 expected docs, 99,000 with the buffer.
        let partitioner = TimeSeriesPartitioner::new(&config, 10_000, 100, 9_000_000).unwrap();

        let windows = partitioner.generate_windows().unwrap();
        assert_eq!(windows.frequency(), Frequency::Second);
        assert_eq!(windows.grid_len(), 100_000);
        assert_eq!(windows.len(), 10);

        let all: Vec<_> = windows.collect();
        assert_eq!(all.len(), 10);
        let first = generate_timestamps_from_window(&all[0], Frequency::Second, "epoch_s").unwrap();
        assert_eq!(first.len(), 10_000);
        assert_eq!(first.iter().count(), 10_000);
    }

    #[test]
    fn test_windows_are_disjoint_and_ordered() {
        let config = config("2019-01-01", "2019-01-01T00:16:39", "s");
        let partitioner = TimeSeriesPartitioner::new(&config, 300, 10, 5_000).unwrap();
        let windows: Vec<_> = partitioner.generate_windows().unwrap().collect();

        // 1,000 timestamps in chunks of 300: three full windows and a short one.
        assert_eq!(windows.len(), 4);
        for pair in windows.windows(2) {
            assert!(pair[0].end < pair[1].start);
            assert_eq!(pair[1].start - pair[0].end, Duration::seconds(1));
        }
        let last = windows.last().unwrap();
        assert_eq!(TimestampGrid::new(last.start, last.end, Frequency::Second).len(), 100);
    }

    #[test]
    fn test_frequency_is_refined_until_grid_is_large_enough() {
        // One day holds 1 daily timestamp, 24 hourly, 1,440 by the minute.
        let config = config("2019-01-01", "2019-01-01T23:59:59", "D");
        let partitioner = TimeSeriesPartitioner::new(&config, 10, 10, 1_000).unwrap();
        let windows = partitioner.generate_windows().unwrap();
        assert_eq!(windows.frequency(), Frequency::Minute);
        assert_eq!(windows.grid_len(), 1_440);
    }

    #[test]
    fn test_insufficient_range() {
        let config = config("2019-01-01", "2019-01-01", "ms");
        let partitioner = TimeSeriesPartitioner::new(&config, 10, 10, 1_000).unwrap();
        match partitioner.generate_windows().unwrap_err() {
            PartitionError::InsufficientTimestampRange {
                needed,
                available,
                frequency,
            } => {
                assert_eq!(needed, 110);
                assert_eq!(available, 1);
                assert_eq!(frequency, Frequency::Millisecond);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_small_target_still_fills_first_window() {
        let config = config("2019-01-01", "2019-01-01T00:00:05", "s");
        let partitioner = TimeSeriesPartitioner::new(&config, 1_000, 100, 100).unwrap();
        assert_eq!(partitioner.required_timestamps(), 1_000);
        let windows = partitioner.generate_windows().unwrap();
        assert_eq!(windows.frequency(), Frequency::Millisecond);
        assert_eq!(windows.grid_len(), 5_001);
    }

    #[test]
    fn test_business_day_windows() {
        let config = config("2019-01-05", "2019-12-31", "B");
        let partitioner = TimeSeriesPartitioner::new(&config, 5, 10, 100).unwrap();
        let windows = partitioner.generate_windows().unwrap();
        assert_eq!(windows.frequency(), Frequency::BusinessDay);

        let first = windows.clone().next().unwrap();
        assert_eq!(first.start, midnight(2019, 1, 7));
        assert_eq!(first.end, midnight(2019, 1, 11));
    }

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(
            TimeSeriesPartitioner::new(&config("2019-01-01", "2019-12-31", "bh"), 10, 10, 10),
            Err(PartitionError::UnsupportedFrequency(f)) if f == "bh"
        ));

        let mut bad_format = config("2019-01-01", "2019-12-31", "min");
        bad_format.format = "%Q".to_string();
        assert!(matches!(
            TimeSeriesPartitioner::new(&bad_format, 10, 10, 10),
            Err(PartitionError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            TimeSeriesPartitioner::new(&config("2019-12-31", "2019-01-01", "min"), 10, 10, 10),
            Err(PartitionError::InvalidDate(_))
        ));

        assert!(matches!(
            TimeSeriesPartitioner::new(&config("2019-01-01", "2019-12-31", "min"), 0, 10, 10),
            Err(PartitionError::InvalidSizing(_))
        ));
    }

    #[test]
    fn test_window_timestamps_formats_and_restart() {
        let window = TimestampWindow {
            start: midnight(2019, 1, 1),
            end: midnight(2019, 1, 1) + Duration::minutes(2),
        };

        let iso = generate_timestamps_from_window(&window, Frequency::Minute, "%Y-%m-%dT%H:%M:%S").unwrap();
        let rendered: Vec<_> = iso.iter().collect();
        assert_eq!(
            rendered,
            vec![
                json!("2019-01-01T00:00:00"),
                json!("2019-01-01T00:01:00"),
                json!("2019-01-01T00:02:00")
            ]
        );
        assert_eq!(iso.iter().collect::<Vec<_>>(), rendered);

        let millis = generate_timestamps_from_window(&window, Frequency::Minute, "epoch_ms").unwrap();
        assert_eq!(millis.iter().next(), Some(json!(1_546_300_800_000i64)));
    }

    #[test]
    fn test_window_timestamps_unsupported_format() {
        let window = TimestampWindow {
            start: midnight(2019, 1, 1),
            end: midnight(2019, 1, 2),
        };
        assert!(matches!(
            generate_timestamps_from_window(&window, Frequency::Hour, "yyyy"),
            Err(PartitionError::UnsupportedFormat(f)) if f == "yyyy"
        ));
    }
}
