//! Date and timestamp value generators.

use crate::error::GenerationError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rand::Rng;
use sdg_core::{DateFormat, GeneratorKind};
use serde_json::{json, Value};

const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";

/// Resolved bounds and output formats for the date generators.
#[derive(Debug, Clone, PartialEq)]
pub struct DateParams {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Alternatives picked from uniformly per value. Empty means ISO date.
    pub formats: Vec<DateFormat>,
}

impl DateParams {
    /// Default start: 2000-01-01.
    pub fn default_start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    /// Default end: midnight UTC of the current day, so seeded runs on the
    /// same day draw from the same window.
    pub fn default_end() -> NaiveDateTime {
        Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default()
    }

    fn pick_format<R: Rng>(&self, rng: &mut R) -> Option<DateFormat> {
        match self.formats.len() {
            0 => None,
            1 => Some(self.formats[0]),
            n => Some(self.formats[rng.random_range(0..n)]),
        }
    }
}

/// Draw a second-resolution datetime in `[start, end]`.
fn random_datetime<R: Rng>(
    rng: &mut R,
    start: NaiveDateTime,
    end: NaiveDateTime,
    kind: GeneratorKind,
) -> Result<NaiveDateTime, GenerationError> {
    let start_ts = start.and_utc().timestamp();
    let end_ts = end.and_utc().timestamp();
    let ts = if start_ts >= end_ts {
        start_ts
    } else {
        rng.random_range(start_ts..=end_ts)
    };
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.naive_utc())
        .ok_or(GenerationError::DateOutOfRange { kind })
}

fn render(timestamp: &NaiveDateTime, format: Option<DateFormat>) -> Value {
    match format {
        Some(format) => format.render(timestamp),
        None => Value::String(timestamp.date().to_string()),
    }
}

/// Generate a date in the configured window.
pub fn generate_date<R: Rng>(rng: &mut R, params: &DateParams) -> Result<Value, GenerationError> {
    let format = params.pick_format(rng);
    let timestamp = random_datetime(rng, params.start, params.end, GeneratorKind::Date)?;
    Ok(render(&timestamp, format))
}

/// Generate `{gte, lte}` dates.
///
/// The upper bound is drawn first; the lower bound is then drawn with its
/// end pinned to the upper value so the interval is always valid.
pub fn generate_date_range<R: Rng>(
    rng: &mut R,
    params: &DateParams,
) -> Result<Value, GenerationError> {
    let format = params.pick_format(rng);
    let upper = random_datetime(rng, params.start, params.end, GeneratorKind::DateRange)?;
    let lower = random_datetime(rng, params.start, upper, GeneratorKind::DateRange)?;
    Ok(json!({ "gte": render(&lower, format), "lte": render(&upper, format) }))
}

/// Generate an ISO-8601 datetime string.
pub fn generate_timestamp<R: Rng>(
    rng: &mut R,
    params: &DateParams,
) -> Result<Value, GenerationError> {
    let timestamp = random_datetime(rng, params.start, params.end, GeneratorKind::Timestamp)?;
    Ok(Value::String(timestamp.format(ISO_DATETIME).to_string()))
}
