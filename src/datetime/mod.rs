//! Date/time normalization for UI assertions
//!
//! Dates are parsed against an explicit caller-supplied pattern (see [`DatePattern`]),
//! rendered back through the same vocabulary, shifted by calendar units, and compared
//! against "today" at day granularity.
//!
//! # Example
//!
//! ```
//! use pagecheck::datetime::{self, DateFormats, TimeUnit};
//!
//! let date = datetime::parse("01/31/2025", DateFormats::FULL_DATE, true).unwrap();
//! let next = date.add(1, TimeUnit::Month);
//! assert_eq!(datetime::format(&next, DateFormats::FULL_DATE), "02/28/2025");
//! ```

mod ops;
mod parse;
mod pattern;
mod render;

pub use ops::{
    add_days_to_current_date, adjust_date, convert_format, current_date, current_date_time,
    is_after, is_before, is_date_within_range, is_date_within_range_from_today, is_same,
    is_valid_date, is_within_range,
};
pub use parse::{parse, DateParser};
pub use pattern::{DatePattern, Token};
pub use render::format;

use chrono::{FixedOffset, Local, Months, NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Common date formats seen in web UIs.
pub struct DateFormats;

impl DateFormats {
    /// `05/14/2025`
    pub const FULL_DATE: &'static str = "MM/DD/YYYY";
    /// `2025-05-14`
    pub const FULL_DATE_DASH: &'static str = "YYYY-MM-DD";
    /// `05/14/2025 08:15 PM`
    pub const DATE_TIME_12H: &'static str = "MM/DD/YYYY hh:mm A";
    /// `05/14/2025 20:15`
    pub const DATE_TIME_24H: &'static str = "MM/DD/YYYY HH:mm";
    /// `May 14`
    pub const MONTH_NAME_DAY: &'static str = "MMM DD";
    /// `May 14, 2025`
    pub const MONTH_NAME_DAY_YEAR: &'static str = "MMM DD, YYYY";
    /// `2025-05-14T20:15:00+05:30`. A trailing `Z` for UTC only parses leniently.
    pub const ISO: &'static str = "YYYY-MM-DDTHH:mm:ssZ";
}

/// Error type for date parsing and arithmetic failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// Input did not contain the next expected pattern element
    #[error("expected {expected} at position {position} in '{input}'")]
    Mismatch { input: String, position: usize, expected: String },
    /// Input had text left over after the whole pattern was consumed
    #[error("unexpected trailing text '{0}'")]
    TrailingInput(String),
    /// A parsed component is outside its calendar range
    #[error("{field} {value} is out of range")]
    OutOfRange { field: &'static str, value: i64 },
    /// Parsed weekday name disagrees with the parsed date
    #[error("weekday {parsed} does not match {date}")]
    WeekdayMismatch { parsed: String, date: String },
    /// Strict parsing: re-rendering the value did not reproduce the input
    #[error("'{input}' does not match format '{format}' exactly (renders as '{rendered}')")]
    NotExact { input: String, format: String, rendered: String },
    /// Result is outside the representable date range
    #[error("date arithmetic overflowed")]
    Overflow,
    /// Unrecognized time unit name
    #[error("unknown time unit '{0}'")]
    UnknownUnit(String),
}

/// How strictly input must follow its pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Components must be in calendar range and the input must round-trip exactly
    Strict,
    /// Out-of-range components roll over into the next unit
    #[default]
    Lenient,
}

impl From<bool> for ParseMode {
    fn from(strict: bool) -> Self {
        if strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }
}

/// Unit for [`DateValue::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl FromStr for TimeUnit {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Single-letter `M` (month) and `m` (minute) are case-sensitive
        match s {
            "M" => return Ok(TimeUnit::Month),
            "m" => return Ok(TimeUnit::Minute),
            _ => {}
        }
        match s.to_lowercase().as_str() {
            "ms" | "millisecond" | "milliseconds" => Ok(TimeUnit::Millisecond),
            "s" | "second" | "seconds" => Ok(TimeUnit::Second),
            "minute" | "minutes" => Ok(TimeUnit::Minute),
            "h" | "hour" | "hours" => Ok(TimeUnit::Hour),
            "d" | "day" | "days" => Ok(TimeUnit::Day),
            "w" | "week" | "weeks" => Ok(TimeUnit::Week),
            "month" | "months" => Ok(TimeUnit::Month),
            "y" | "year" | "years" => Ok(TimeUnit::Year),
            _ => Err(DateError::UnknownUnit(s.to_string())),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeUnit::Millisecond => "millisecond",
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
        };
        f.write_str(name)
    }
}

/// A calendar date/time, optionally pinned to a UTC offset.
///
/// The offset is only present when the value was parsed through a `Z`/`ZZ` token; the
/// wall-clock fields are always those written in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateValue {
    datetime: NaiveDateTime,
    offset: Option<FixedOffset>,
}

impl DateValue {
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self { datetime, offset: None }
    }

    pub fn with_offset(datetime: NaiveDateTime, offset: FixedOffset) -> Self {
        Self { datetime, offset: Some(offset) }
    }

    /// Midnight on the given calendar day, or `None` if the day does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Self::new)
    }

    /// The current local wall-clock time.
    pub fn now() -> Self {
        Self::new(Local::now().naive_local())
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    pub fn date(&self) -> NaiveDate {
        self.datetime.date()
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// True if both values denote the same instant.
    ///
    /// When both carry offsets they are compared in UTC; otherwise the wall-clock
    /// fields are compared directly.
    pub fn same_instant(&self, other: &DateValue) -> bool {
        match (self.offset, other.offset) {
            (Some(a), Some(b)) => {
                let utc = |dt: NaiveDateTime, off: FixedOffset| {
                    TimeDelta::try_seconds(i64::from(off.local_minus_utc()))
                        .and_then(|delta| dt.checked_sub_signed(delta))
                };
                utc(self.datetime, a) == utc(other.datetime, b)
            }
            _ => self.datetime == other.datetime,
        }
    }

    /// Shift by a signed amount of `unit`.
    ///
    /// Month and year shifts clamp the day to the last valid day of the target month, so
    /// Jan 31 + 1 month is Feb 28 (or 29). A shift that leaves chrono's representable range
    /// returns the value unchanged.
    pub fn add(self, amount: i64, unit: TimeUnit) -> Self {
        match self.checked_add(amount, unit) {
            Ok(shifted) => shifted,
            Err(e) => {
                tracing::warn!(%amount, %unit, error = %e, "date shift out of range, value unchanged");
                self
            }
        }
    }

    /// Like [`DateValue::add`] but reports overflow instead of ignoring it.
    pub fn checked_add(self, amount: i64, unit: TimeUnit) -> Result<Self, DateError> {
        let delta = |d: Option<TimeDelta>| d.ok_or(DateError::Overflow);
        let shifted = match unit {
            TimeUnit::Millisecond => self.shift(delta(TimeDelta::try_milliseconds(amount))?),
            TimeUnit::Second => self.shift(delta(TimeDelta::try_seconds(amount))?),
            TimeUnit::Minute => self.shift(delta(TimeDelta::try_minutes(amount))?),
            TimeUnit::Hour => self.shift(delta(TimeDelta::try_hours(amount))?),
            TimeUnit::Day => self.shift(delta(TimeDelta::try_days(amount))?),
            TimeUnit::Week => self.shift(delta(TimeDelta::try_weeks(amount))?),
            TimeUnit::Month => self.shift_months(amount),
            TimeUnit::Year => self.shift_months(amount.checked_mul(12).ok_or(DateError::Overflow)?),
        };
        let datetime = shifted.ok_or(DateError::Overflow)?;
        Ok(Self { datetime, offset: self.offset })
    }

    fn shift(&self, delta: TimeDelta) -> Option<NaiveDateTime> {
        self.datetime.checked_add_signed(delta)
    }

    fn shift_months(&self, months: i64) -> Option<NaiveDateTime> {
        let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
        if months >= 0 {
            self.datetime.checked_add_months(magnitude)
        } else {
            self.datetime.checked_sub_months(magnitude)
        }
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{}{}", self.datetime.format("%Y-%m-%dT%H:%M:%S%.3f"), offset),
            None => write!(f, "{}", self.datetime.format("%Y-%m-%dT%H:%M:%S%.3f")),
        }
    }
}
