//! Date format allow-list shared by the DATE generators and the time-series
//! partitioner.
//!
//! Formats are named either by their engine name (`strict_date_time`,
//! `epoch_millis`, ...) or by one of a fixed set of strftime patterns
//! (`%Y-%m-%dT%H:%M:%S`). Anything outside the list is rejected up front.

use chrono::NaiveDateTime;
use serde_json::Value;
use std::fmt;

/// Engine date formats and their chrono rendering.
const NAMED_FORMATS: &[(&str, &str)] = &[
    ("strict_year_month", "%Y-%m"),
    ("strict_year_month_day", "%Y-%m-%d"),
    ("year_month_day", "%Y-%m-%d"),
    ("strict_date", "%Y-%m-%d"),
    ("date", "%Y-%m-%d"),
    ("year", "%Y"),
    ("year_month", "%Y-%m"),
    ("basic_date", "%Y%m%d"),
    ("basic_date_time", "%Y%m%dT%H%M%S%.3fZ"),
    ("basic_date_time_no_millis", "%Y%m%dT%H%M%SZ"),
    ("strict_date_hour_minute_second", "%Y-%m-%dT%H:%M:%S"),
    ("date_hour_minute_second", "%Y-%m-%dT%H:%M:%S"),
    ("strict_date_optional_time", "%Y-%m-%dT%H:%M:%S%.3fZ"),
    ("date_optional_time", "%Y-%m-%dT%H:%M:%S%.3fZ"),
    ("strict_date_time", "%Y-%m-%dT%H:%M:%S%.3fZ"),
    ("date_time", "%Y-%m-%dT%H:%M:%S%.3fZ"),
    ("strict_date_time_no_millis", "%Y-%m-%dT%H:%M:%SZ"),
    ("date_time_no_millis", "%Y-%m-%dT%H:%M:%SZ"),
    ("strict_hour_minute_second", "%H:%M:%S"),
];

/// strftime patterns accepted verbatim, paired with their chrono spelling.
const PATTERN_FORMATS: &[(&str, &str)] = &[
    ("%Y-%m-%d", "%Y-%m-%d"),
    ("%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S"),
    ("%Y-%m-%dT%H:%M:%S.%f", "%Y-%m-%dT%H:%M:%S.%6f"),
    ("%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S"),
    ("%Y-%m-%d %H:%M:%S.%f", "%Y-%m-%d %H:%M:%S.%6f"),
    ("%d/%m/%Y", "%d/%m/%Y"),
    ("%m/%d/%Y", "%m/%d/%Y"),
    ("%d-%m-%Y", "%d-%m-%Y"),
    ("%m-%d-%Y", "%m-%d-%Y"),
    ("%d.%m.%Y", "%d.%m.%Y"),
    ("%Y%m%d", "%Y%m%d"),
    ("%B %d, %Y", "%B %d, %Y"),
    ("%b %d, %Y", "%b %d, %Y"),
    ("%d %B %Y", "%d %B %Y"),
    ("%d %b %Y", "%d %b %Y"),
    ("%Y %B %d", "%Y %B %d"),
    ("%d/%m/%Y %H:%M", "%d/%m/%Y %H:%M"),
    ("%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M:%S"),
    ("%Y-%m-%d %I:%M %p", "%Y-%m-%d %I:%M %p"),
    ("%d.%m.%Y %H:%M", "%d.%m.%Y %H:%M"),
    ("%H:%M", "%H:%M"),
    ("%H:%M:%S", "%H:%M:%S"),
    ("%I:%M %p", "%I:%M %p"),
    ("%I:%M:%S %p", "%I:%M:%S %p"),
    ("%a, %d %b %Y %H:%M:%S", "%a, %d %b %Y %H:%M:%S"),
    ("%Y/%m/%d", "%Y/%m/%d"),
    ("%Y/%m/%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"),
    ("%Y%m%d%H%M%S", "%Y%m%d%H%M%S"),
];

/// A supported output format for generated dates and timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// Rendered through a chrono strftime pattern.
    Pattern {
        name: &'static str,
        pattern: &'static str,
    },
    /// Integer seconds since the Unix epoch.
    EpochSeconds { name: &'static str },
    /// Integer milliseconds since the Unix epoch.
    EpochMillis { name: &'static str },
}

impl DateFormat {
    /// Look up a format usable by the DATE generators.
    pub fn parse(format: &str) -> Option<DateFormat> {
        let format = format.trim();
        if let Some(&(name, pattern)) = NAMED_FORMATS
            .iter()
            .chain(PATTERN_FORMATS.iter())
            .find(|(name, _)| *name == format)
        {
            return Some(DateFormat::Pattern { name, pattern });
        }
        match format {
            "epoch_second" => Some(DateFormat::EpochSeconds {
                name: "epoch_second",
            }),
            "epoch_millis" => Some(DateFormat::EpochMillis {
                name: "epoch_millis",
            }),
            _ => None,
        }
    }

    /// Look up a format usable for time-series timestamps.
    ///
    /// Accepts everything [`DateFormat::parse`] does plus the `epoch_s` and
    /// `epoch_ms` shorthands.
    pub fn parse_timeseries(format: &str) -> Option<DateFormat> {
        match format.trim() {
            "epoch_s" => Some(DateFormat::EpochSeconds { name: "epoch_s" }),
            "epoch_ms" => Some(DateFormat::EpochMillis { name: "epoch_ms" }),
            other => DateFormat::parse(other),
        }
    }

    /// Parse a `||`-separated list of alternatives.
    ///
    /// Returns the first unsupported entry as the error.
    pub fn parse_alternatives(formats: &str) -> Result<Vec<DateFormat>, String> {
        formats
            .split("||")
            .map(|f| DateFormat::parse(f).ok_or_else(|| f.trim().to_string()))
            .collect()
    }

    /// Name the format was looked up by.
    pub fn name(&self) -> &'static str {
        match self {
            DateFormat::Pattern { name, .. }
            | DateFormat::EpochSeconds { name }
            | DateFormat::EpochMillis { name } => *name,
        }
    }

    /// Render a timestamp as a JSON value. Naive timestamps are treated as UTC.
    pub fn render(&self, timestamp: &NaiveDateTime) -> Value {
        match self {
            DateFormat::Pattern { pattern, .. } => {
                Value::String(timestamp.format(pattern).to_string())
            }
            DateFormat::EpochSeconds { .. } => Value::from(timestamp.and_utc().timestamp()),
            DateFormat::EpochMillis { .. } => {
                Value::from(timestamp.and_utc().timestamp_millis())
            }
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every format name accepted by [`DateFormat::parse`].
pub fn supported_date_formats() -> impl Iterator<Item = &'static str> {
    NAMED_FORMATS
        .iter()
        .chain(PATTERN_FORMATS.iter())
        .map(|(name, _)| *name)
        .chain(["epoch_second", "epoch_millis"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 5, 20)
            .unwrap()
            .and_hms_micro_opt(15, 30, 45, 123_456)
            .unwrap()
    }

    #[test]
    fn test_named_formats() {
        let ts = sample();
        let render = |name: &str| DateFormat::parse(name).unwrap().render(&ts);
        assert_eq!(render("strict_year_month"), Value::from("2023-05"));
        assert_eq!(render("strict_year_month_day"), Value::from("2023-05-20"));
        assert_eq!(
            render("strict_date_time"),
            Value::from("2023-05-20T15:30:45.123Z")
        );
        assert_eq!(render("epoch_second"), Value::from(1_684_596_645_i64));
    }

    #[test]
    fn test_pattern_formats() {
        let ts = sample();
        let render = |name: &str| DateFormat::parse(name).unwrap().render(&ts);
        assert_eq!(render("%Y-%m-%dT%H:%M:%S"), Value::from("2023-05-20T15:30:45"));
        assert_eq!(
            render("%Y-%m-%d %H:%M:%S.%f"),
            Value::from("2023-05-20 15:30:45.123456")
        );
        assert_eq!(render("%b %d, %Y"), Value::from("May 20, 2023"));
        assert_eq!(render("%I:%M %p"), Value::from("03:30 PM"));
    }

    #[test]
    fn test_every_supported_format_renders() {
        let ts = sample();
        for name in supported_date_formats() {
            let format = DateFormat::parse(name).unwrap();
            assert!(!format.render(&ts).is_null(), "{name}");
        }
    }

    #[test]
    fn test_epoch_shorthands_are_timeseries_only() {
        assert!(DateFormat::parse("epoch_ms").is_none());
        let ms = DateFormat::parse_timeseries("epoch_ms").unwrap();
        assert_eq!(ms.render(&sample()), Value::from(1_684_596_645_123_i64));
        assert!(DateFormat::parse_timeseries("%Y").is_none());
    }

    #[test]
    fn test_alternatives() {
        let formats = DateFormat::parse_alternatives("strict_date_optional_time||epoch_millis").unwrap();
        assert_eq!(formats.len(), 2);
        let err = DateFormat::parse_alternatives("strict_year_month||bogus").unwrap_err();
        assert_eq!(err, "bogus");
    }
}
