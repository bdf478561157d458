//! Timestamp frequencies and the grids they produce.
//!
//! A [`TimestampGrid`] is the sequence of timestamps at a given frequency
//! between two bounds (both inclusive). Grids are never materialized: their
//! length and the n-th timestamp are computed arithmetically, so a
//! millisecond grid over a whole year costs nothing to describe.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use std::fmt;
use std::str::FromStr;

/// Supported frequencies, coarse to fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Frequency {
    /// Business days (Monday to Friday)
    BusinessDay,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl Frequency {
    /// All frequencies in refinement order.
    pub const ALL: [Frequency; 6] = [
        Frequency::BusinessDay,
        Frequency::Day,
        Frequency::Hour,
        Frequency::Minute,
        Frequency::Second,
        Frequency::Millisecond,
    ];

    /// Next finer frequency, if any.
    pub fn finer(&self) -> Option<Frequency> {
        let position = Self::ALL.iter().position(|f| f == self)?;
        Self::ALL.get(position + 1).copied()
    }

    /// Fixed step in milliseconds; `None` for business days.
    fn step_millis(&self) -> Option<i64> {
        match self {
            Frequency::BusinessDay => None,
            Frequency::Day => Some(86_400_000),
            Frequency::Hour => Some(3_600_000),
            Frequency::Minute => Some(60_000),
            Frequency::Second => Some(1_000),
            Frequency::Millisecond => Some(1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::BusinessDay => "B",
            Frequency::Day => "D",
            Frequency::Hour => "h",
            Frequency::Minute => "min",
            Frequency::Second => "s",
            Frequency::Millisecond => "ms",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "B" => Ok(Frequency::BusinessDay),
            "D" => Ok(Frequency::Day),
            "h" | "H" => Ok(Frequency::Hour),
            "min" | "T" => Ok(Frequency::Minute),
            "s" | "S" => Ok(Frequency::Second),
            "ms" | "L" => Ok(Frequency::Millisecond),
            other => Err(other.to_string()),
        }
    }
}

/// Timestamps at `frequency` from `first` up to an inclusive bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampGrid {
    first: NaiveDateTime,
    len: u64,
    frequency: Frequency,
}

impl TimestampGrid {
    /// Grid over `[start, end]`.
    ///
    /// Business-day grids start on the first weekday at or after `start` and
    /// keep its time of day.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, frequency: Frequency) -> Self {
        let (first, len) = match frequency.step_millis() {
            Some(step) => {
                let span = (end - start).num_milliseconds();
                let len = if span < 0 { 0 } else { (span / step) as u64 + 1 };
                (start, len)
            }
            None => {
                let first_day = roll_to_weekday(start.date());
                let first = first_day.and_time(start.time());
                let mut last_day = end.date();
                if end.time() < start.time() {
                    last_day = last_day.pred_opt().unwrap_or(last_day);
                }
                let last_day = roll_back_to_weekday(last_day);
                let len = if last_day < first_day {
                    0
                } else {
                    business_days_between(first_day, last_day)
                };
                (first, len)
            }
        };
        Self {
            first,
            len,
            frequency,
        }
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// The `index`-th timestamp, or `None` past the end.
    pub fn nth(&self, index: u64) -> Option<NaiveDateTime> {
        if index >= self.len {
            return None;
        }
        match self.frequency.step_millis() {
            Some(step) => {
                let offset = i64::try_from(index).ok()?.checked_mul(step)?;
                self.first.checked_add_signed(Duration::milliseconds(offset))
            }
            None => {
                let day = nth_business_day(self.first.date(), index)?;
                Some(day.and_time(self.first.time()))
            }
        }
    }

    /// Iterate the grid lazily.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        (0..self.len).map_while(move |i| self.nth(i))
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn roll_to_weekday(mut date: NaiveDate) -> NaiveDate {
    while is_weekend(date) {
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    date
}

fn roll_back_to_weekday(mut date: NaiveDate) -> NaiveDate {
    while is_weekend(date) {
        match date.pred_opt() {
            Some(prev) => date = prev,
            None => break,
        }
    }
    date
}

/// Business days in `[first, last]`; `first` must be a weekday.
fn business_days_between(first: NaiveDate, last: NaiveDate) -> u64 {
    let days = (last - first).num_days();
    let full_weeks = days / 7;
    let mut count = full_weeks as u64 * 5;
    let mut day = first + Duration::days(full_weeks * 7);
    while day <= last {
        if !is_weekend(day) {
            count += 1;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    count
}

/// The `n`-th business day counting `first` (a weekday) as day zero.
fn nth_business_day(first: NaiveDate, n: u64) -> Option<NaiveDate> {
    let weeks = i64::try_from(n / 5).ok()?;
    let mut day = first.checked_add_signed(Duration::days(weeks.checked_mul(7)?))?;
    let mut remaining = n % 5;
    while remaining > 0 {
        day = day.succ_opt()?;
        if !is_weekend(day) {
            remaining -= 1;
        }
    }
    Some(day)
}
