//! Pass/fail assertions over values scraped from a rendered page
//!
//! Callers extract the computed style or visible text themselves and hand the string
//! over; this module only decides whether it matches the expectation and produces a
//! readable failure message.
//!
//! ```
//! use pagecheck::assertions::{expect_color, ColorTarget};
//!
//! assert!(expect_color(ColorTarget::Text, "rgb(255, 0, 0)", "#ff0000").is_ok());
//! let err = expect_color(ColorTarget::Background, "rgb(0, 128, 0)", "red").unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Expected background color to be \"red\", but got \"rgb(0, 128, 0)\""
//! );
//! ```

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color;
use crate::config::DatesConfig;
use crate::datetime::{self, DateError, DateParser, DateValue};

/// Pattern used to validate a month/day string once the current year is appended
const MONTH_DAY_YEAR: &str = "MMM DD YYYY";

/// Error returned when an assertion does not hold
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssertionError {
    /// The value was understood but did not match
    #[error("{0}")]
    Mismatch(String),
    /// The UI text could not be read as a date
    #[error("could not read date '{text}': {source}")]
    Date {
        text: String,
        #[source]
        source: DateError,
    },
}

impl AssertionError {
    fn mismatch(message: impl Into<String>) -> Self {
        AssertionError::Mismatch(message.into())
    }

    fn date(text: &str, source: DateError) -> Self {
        AssertionError::Date { text: text.to_string(), source }
    }
}

/// Which computed style property a color was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorTarget {
    /// CSS `color`
    #[default]
    Text,
    /// CSS `background-color`
    Background,
}

impl fmt::Display for ColorTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorTarget::Text => f.write_str("text color"),
            ColorTarget::Background => f.write_str("background color"),
        }
    }
}

/// Non-asserting color check.
pub fn color_matches(actual: &str, expected: &str) -> bool {
    color::compare(actual.trim(), expected)
}

/// Assert that a computed color matches the expected name, hex, or `rgb()` value.
pub fn expect_color(target: ColorTarget, actual: &str, expected: &str) -> Result<(), AssertionError> {
    let actual = actual.trim();
    if color::compare(actual, expected) {
        Ok(())
    } else {
        Err(AssertionError::mismatch(format!(
            "Expected {} to be \"{}\", but got \"{}\"",
            target, expected, actual
        )))
    }
}

/// Date assertions evaluated relative to a fixed "now".
#[derive(Debug, Clone)]
pub struct DateAssertions {
    now: DateValue,
    settings: DatesConfig,
}

impl DateAssertions {
    /// Assertions relative to the current local time.
    pub fn today() -> Self {
        Self::at(DateValue::now())
    }

    /// Assertions relative to `now`.
    pub fn at(now: DateValue) -> Self {
        Self { now, settings: DatesConfig::default() }
    }

    pub fn with_settings(mut self, settings: DatesConfig) -> Self {
        self.settings = settings;
        self
    }

    pub fn now(&self) -> &DateValue {
        &self.now
    }

    fn parser(&self) -> DateParser {
        DateParser::lenient().with_reference(self.now.date())
    }

    fn read(&self, text: &str, format: &str) -> Result<DateValue, AssertionError> {
        self.parser().parse(text, format).map_err(|e| AssertionError::date(text, e))
    }

    /// UI date, converted from `from` to `to`, must equal `expected`.
    pub fn validate_date_format(
        &self,
        ui_text: &str,
        from: &str,
        to: &str,
        expected: &str,
    ) -> Result<(), AssertionError> {
        let text = ui_text.trim();
        let converted = datetime::format(&self.read(text, from)?, to);
        if converted == expected {
            Ok(())
        } else {
            Err(AssertionError::mismatch(format!(
                "Expected date \"{}\" as {} to be \"{}\", but got \"{}\"",
                text, to, expected, converted
            )))
        }
    }

    /// UI date must fall within `days_before`..`days_after` days of today.
    pub fn validate_date_within_range(
        &self,
        ui_text: &str,
        format: &str,
        days_before: i64,
        days_after: i64,
    ) -> Result<(), AssertionError> {
        let text = ui_text.trim();
        let target = self.read(text, format)?;
        if datetime::is_within_range(&target, days_before, days_after, &self.now) {
            Ok(())
        } else {
            Err(AssertionError::mismatch(format!(
                "Expected date \"{}\" to be within {} day(s) before and {} day(s) after {}",
                text,
                days_before,
                days_after,
                datetime::format(&self.now, &self.settings.format)
            )))
        }
    }

    /// A `MMM DD` date (e.g. "May 14") must be a real day in the current year.
    pub fn validate_month_day_format(&self, ui_text: &str) -> Result<(), AssertionError> {
        let text = ui_text.trim();
        let full = format!("{} {}", text, datetime::format(&self.now, "YYYY"));
        match DateParser::strict().with_reference(self.now.date()).parse(&full, MONTH_DAY_YEAR) {
            Ok(_) => Ok(()),
            Err(e) => Err(AssertionError::date(&full, e)),
        }
    }

    /// UI text must equal today rendered in `format`.
    pub fn validate_date_is_today(&self, ui_text: &str, format: &str) -> Result<(), AssertionError> {
        let text = ui_text.trim();
        let today = datetime::format(&self.now, format);
        if text == today {
            Ok(())
        } else {
            Err(AssertionError::mismatch(format!(
                "Expected date to be today (\"{}\"), but got \"{}\"",
                today, text
            )))
        }
    }

    /// UI date must be on a day before today.
    ///
    /// With `legacy_window_days` configured, only dates within that many days count.
    pub fn validate_date_is_before_today(&self, ui_text: &str, format: &str) -> Result<(), AssertionError> {
        let text = ui_text.trim();
        let target = self.read(text, format)?;
        let before = match self.settings.legacy_window_days {
            Some(window) => datetime::is_within_range(&target, window, -1, &self.now),
            None => datetime::is_before(&target, &self.now),
        };
        if before {
            Ok(())
        } else {
            Err(AssertionError::mismatch(format!("Expected date \"{}\" to be before today", text)))
        }
    }

    /// UI date must be on a day after today.
    ///
    /// With `legacy_window_days` configured, only dates within that many days count.
    pub fn validate_date_is_after_today(&self, ui_text: &str, format: &str) -> Result<(), AssertionError> {
        let text = ui_text.trim();
        let target = self.read(text, format)?;
        let after = match self.settings.legacy_window_days {
            Some(window) => datetime::is_within_range(&target, -1, window, &self.now),
            None => datetime::is_after(&target, &self.now),
        };
        if after {
            Ok(())
        } else {
            Err(AssertionError::mismatch(format!("Expected date \"{}\" to be after today", text)))
        }
    }

    /// Two UI dates must denote the same instant.
    pub fn validate_two_dates_match(&self, first: &str, second: &str, format: &str) -> Result<(), AssertionError> {
        let (first, second) = (first.trim(), second.trim());
        let a = self.read(first, format)?;
        let b = self.read(second, format)?;
        if a.same_instant(&b) {
            Ok(())
        } else {
            Err(AssertionError::mismatch(format!(
                "Expected dates \"{}\" and \"{}\" to match",
                first, second
            )))
        }
    }

    /// UI text must be a strictly valid date under `format`.
    pub fn validate_date_is_valid(&self, ui_text: &str, format: &str) -> Result<(), AssertionError> {
        let text = ui_text.trim();
        DateParser::new(self.settings.parse_mode())
            .with_reference(self.now.date())
            .parse(text, format)
            .map(|_| ())
            .map_err(|e| AssertionError::date(text, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assertions() -> DateAssertions {
        DateAssertions::at(DateValue::from_ymd(2025, 5, 14).expect("valid date"))
    }

    #[test]
    fn test_expect_text_color() {
        assert!(expect_color(ColorTarget::Text, " rgb(255, 0, 0) ", "red").is_ok());
        let err = expect_color(ColorTarget::Text, "rgb(0, 0, 0)", "#fff").unwrap_err();
        assert_eq!(err.to_string(), "Expected text color to be \"#fff\", but got \"rgb(0, 0, 0)\"");
    }

    #[test]
    fn test_color_matches() {
        assert!(color_matches("rgb(0, 128, 0)", "green"));
        assert!(!color_matches("rgba(0, 0, 0, 0)", "black"));
    }

    #[test]
    fn test_validate_date_format() {
        let a = assertions();
        assert!(a.validate_date_format(" 14-05-2025 ", "DD-MM-YYYY", "MM/DD/YYYY", "05/14/2025").is_ok());
        assert!(matches!(
            a.validate_date_format("14-05-2025", "DD-MM-YYYY", "MM/DD/YYYY", "05/15/2025"),
            Err(AssertionError::Mismatch(_))
        ));
        assert!(matches!(
            a.validate_date_format("yesterday", "DD-MM-YYYY", "MM/DD/YYYY", "05/15/2025"),
            Err(AssertionError::Date { .. })
        ));
    }

    #[test]
    fn test_validate_date_within_range() {
        let a = assertions();
        assert!(a.validate_date_within_range("05/16/2025", "MM/DD/YYYY", 2, 3).is_ok());
        assert!(a.validate_date_within_range("05/04/2025", "MM/DD/YYYY", 2, 3).is_err());
    }

    #[test]
    fn test_validate_month_day_format() {
        let a = assertions();
        assert!(a.validate_month_day_format("May 14").is_ok());
        assert!(a.validate_month_day_format("Feb 29").is_err());
        assert!(a.validate_month_day_format("May 4").is_err());
        assert!(a.validate_month_day_format("14 May").is_err());
    }

    #[test]
    fn test_validate_date_is_today() {
        let a = assertions();
        assert!(a.validate_date_is_today("05/14/2025", "MM/DD/YYYY").is_ok());
        assert!(a.validate_date_is_today("May 14, 2025", "MMM DD, YYYY").is_ok());
        assert!(a.validate_date_is_today("05/13/2025", "MM/DD/YYYY").is_err());
    }

    #[test]
    fn test_before_and_after_today() {
        let a = assertions();
        assert!(a.validate_date_is_before_today("05/13/2025", "MM/DD/YYYY").is_ok());
        assert!(a.validate_date_is_before_today("01/01/1990", "MM/DD/YYYY").is_ok());
        assert!(a.validate_date_is_before_today("05/14/2025", "MM/DD/YYYY").is_err());
        assert!(a.validate_date_is_after_today("05/15/2025", "MM/DD/YYYY").is_ok());
        assert!(a.validate_date_is_after_today("05/14/2025", "MM/DD/YYYY").is_err());
    }

    #[test]
    fn test_legacy_window() {
        let settings = DatesConfig { legacy_window_days: Some(3650), ..DatesConfig::default() };
        let a = assertions().with_settings(settings);
        assert!(a.validate_date_is_before_today("05/13/2025", "MM/DD/YYYY").is_ok());
        assert!(a.validate_date_is_before_today("01/01/1990", "MM/DD/YYYY").is_err());
        assert!(a.validate_date_is_after_today("01/01/2099", "MM/DD/YYYY").is_err());
    }

    #[test]
    fn test_validate_two_dates_match() {
        let a = assertions();
        assert!(a.validate_two_dates_match("05/14/2025", " 05/14/2025", "MM/DD/YYYY").is_ok());
        assert!(a.validate_two_dates_match("05/14/2025", "05/15/2025", "MM/DD/YYYY").is_err());
    }

    #[test]
    fn test_validate_date_is_valid_uses_configured_mode() {
        let a = assertions();
        assert!(a.validate_date_is_valid("02/30/2025", "MM/DD/YYYY").is_err());

        let lenient = DatesConfig { strict: false, ..DatesConfig::default() };
        let a = assertions().with_settings(lenient);
        assert!(a.validate_date_is_valid("02/30/2025", "MM/DD/YYYY").is_ok());
    }
}
