//! Parsing date strings against a pattern
//!
//! Numeric tokens accept a fixed digit count (`YYYY` four, `YY` two, `SSS` three) or one
//! to two digits (everything else). Components missing from the pattern default from a
//! reference day, which is today unless overridden:
//!
//! - year: the reference year
//! - month: January when a year was parsed, otherwise the reference month
//! - day: the 1st when a year or month was parsed, otherwise the reference day
//! - time of day: midnight
//!
//! A zero year, month or day counts as missing, so lenient `02/00/2025` is February 1st
//! rather than the last day of January.

use super::pattern::{DatePattern, Token};
use super::render::{render, MONTH_NAMES, WEEKDAY_NAMES};
use super::{DateError, DateValue, ParseMode};
use chrono::{
    Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Weekday,
};

/// Parse a date string under a pattern.
///
/// With `strict`, every component must be in calendar range and re-rendering the result
/// must reproduce `input` exactly. Without it, out-of-range components roll over
/// (`02/30/2025` becomes March 2nd), but input that does not follow the pattern's layout is
/// still rejected.
///
/// ```
/// use pagecheck::datetime::{format, parse};
///
/// let date = parse("05/14/2025", "MM/DD/YYYY", true).unwrap();
/// assert_eq!(format(&date, "YYYY-MM-DD"), "2025-05-14");
///
/// assert!(parse("02/30/2025", "MM/DD/YYYY", true).is_err());
/// let rolled = parse("02/30/2025", "MM/DD/YYYY", false).unwrap();
/// assert_eq!(format(&rolled, "MM/DD/YYYY"), "03/02/2025");
/// ```
pub fn parse(input: &str, format: &str, strict: bool) -> Result<DateValue, DateError> {
    DateParser::new(ParseMode::from(strict)).parse(input, format)
}

/// Configurable date parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateParser {
    mode: ParseMode,
    /// Day used to fill in components the pattern does not mention
    reference: Option<NaiveDate>,
}

impl DateParser {
    pub fn new(mode: ParseMode) -> Self {
        Self { mode, reference: None }
    }

    pub fn strict() -> Self {
        Self::new(ParseMode::Strict)
    }

    pub fn lenient() -> Self {
        Self::new(ParseMode::Lenient)
    }

    /// Use `today` instead of the local date for components missing from the pattern.
    pub fn with_reference(mut self, today: NaiveDate) -> Self {
        self.reference = Some(today);
        self
    }

    pub fn parse(&self, input: &str, format: &str) -> Result<DateValue, DateError> {
        self.parse_pattern(input, &DatePattern::compile(format))
    }

    pub fn parse_pattern(&self, input: &str, pattern: &DatePattern) -> Result<DateValue, DateError> {
        let fields = scan(input, pattern)?;
        let weekday = fields.weekday;
        let offset = fields.offset;

        let datetime = match self.mode {
            ParseMode::Strict => self.build_strict(&fields)?,
            ParseMode::Lenient => self.build_lenient(&fields)?,
        };

        let value = match offset {
            Some(offset) => DateValue::with_offset(datetime, offset),
            None => DateValue::new(datetime),
        };

        if self.mode == ParseMode::Strict {
            if let Some(parsed) = weekday {
                if parsed != datetime.weekday() {
                    return Err(DateError::WeekdayMismatch {
                        parsed: parsed.to_string(),
                        date: datetime.date().to_string(),
                    });
                }
            }

            let rendered = render(&value, pattern);
            if rendered != input {
                return Err(DateError::NotExact {
                    input: input.to_string(),
                    format: pattern.source().to_string(),
                    rendered,
                });
            }
        }

        tracing::debug!(input, format = pattern.source(), mode = ?self.mode, %value, "parsed date");
        Ok(value)
    }

    fn today(&self) -> NaiveDate {
        self.reference.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Year, month and day with missing components filled in from the reference day.
    fn calendar_fields(&self, fields: &Fields) -> (i64, i64, i64) {
        let today = self.today();
        let given = |field: Option<i64>| field.filter(|&v| v != 0);
        let (year, month, day) = (given(fields.year), given(fields.month), given(fields.day));

        let resolved_month = match (year, month) {
            (_, Some(month)) => month,
            (Some(_), None) => 1,
            (None, None) => i64::from(today.month()),
        };
        let resolved_day = match day {
            Some(day) => day,
            None if year.is_none() && month.is_none() => i64::from(today.day()),
            None => 1,
        };
        (year.unwrap_or_else(|| i64::from(today.year())), resolved_month, resolved_day)
    }

    fn build_strict(&self, fields: &Fields) -> Result<NaiveDateTime, DateError> {
        let (year, month, day) = self.calendar_fields(fields);
        let hour = fields.hour_of_day();

        let month = in_range("month", month, 1, 12)?;
        let day_u32 = in_range("day", day, 1, 31)?;
        let year = i32::try_from(year).map_err(|_| DateError::OutOfRange { field: "year", value: year })?;
        let date = NaiveDate::from_ymd_opt(year, month, day_u32)
            .ok_or(DateError::OutOfRange { field: "day", value: day })?;

        let time = NaiveTime::from_hms_milli_opt(
            in_range("hour", hour, 0, 23)?,
            in_range("minute", fields.minute.unwrap_or(0), 0, 59)?,
            in_range("second", fields.second.unwrap_or(0), 0, 59)?,
            in_range("millisecond", fields.millisecond.unwrap_or(0), 0, 999)?,
        )
        .ok_or(DateError::OutOfRange { field: "time", value: hour })?;

        Ok(date.and_time(time))
    }

    fn build_lenient(&self, fields: &Fields) -> Result<NaiveDateTime, DateError> {
        let (year, month, day) = self.calendar_fields(fields);

        // Month 13 is January of the next year
        let total_months = year
            .checked_mul(12)
            .and_then(|m| m.checked_add(month - 1))
            .ok_or(DateError::Overflow)?;
        let year = i32::try_from(total_months.div_euclid(12)).map_err(|_| DateError::Overflow)?;
        let month = (total_months.rem_euclid(12) + 1) as u32;

        let midnight = NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|first| first.checked_add_signed(TimeDelta::try_days(day - 1)?))
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or(DateError::Overflow)?;

        [
            TimeDelta::try_hours(fields.hour_of_day()),
            TimeDelta::try_minutes(fields.minute.unwrap_or(0)),
            TimeDelta::try_seconds(fields.second.unwrap_or(0)),
            TimeDelta::try_milliseconds(fields.millisecond.unwrap_or(0)),
        ]
        .into_iter()
        .try_fold(midnight, |dt, delta| delta.and_then(|d| dt.checked_add_signed(d)))
        .ok_or(DateError::Overflow)
    }
}

fn in_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<u32, DateError> {
    if value < min || value > max {
        return Err(DateError::OutOfRange { field, value });
    }
    u32::try_from(value).map_err(|_| DateError::OutOfRange { field, value })
}

/// Raw components pulled out of the input before calendar validation.
#[derive(Debug, Default)]
struct Fields {
    year: Option<i64>,
    month: Option<i64>,
    day: Option<i64>,
    hour: Option<i64>,
    minute: Option<i64>,
    second: Option<i64>,
    millisecond: Option<i64>,
    afternoon: Option<bool>,
    weekday: Option<Weekday>,
    offset: Option<FixedOffset>,
}

impl Fields {
    /// Hour on a 24h clock after applying any AM/PM marker.
    fn hour_of_day(&self) -> i64 {
        let hour = self.hour.unwrap_or(0);
        match self.afternoon {
            Some(true) if hour < 12 => hour + 12,
            Some(false) if hour == 12 => 0,
            _ => hour,
        }
    }
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Consume between `min` and `max` ASCII digits.
    fn digits(&mut self, min: usize, max: usize) -> Option<i64> {
        let rest = self.rest();
        let count = rest.bytes().take(max).take_while(u8::is_ascii_digit).count();
        if count < min {
            return None;
        }
        let value = rest[..count].parse().ok()?;
        self.pos += count;
        Some(value)
    }

    /// Consume the first name that prefixes the input, ignoring ASCII case.
    fn name(&mut self, names: &[&str]) -> Option<usize> {
        let rest = self.rest();
        let index = names.iter().position(|name| {
            rest.get(..name.len()).is_some_and(|head| head.eq_ignore_ascii_case(name))
        })?;
        self.pos += names[index].len();
        Some(index)
    }

    fn literal(&mut self, text: &str) -> bool {
        if self.rest().starts_with(text) {
            self.pos += text.len();
            true
        } else {
            false
        }
    }

    fn offset(&mut self) -> Option<Result<FixedOffset, DateError>> {
        if self.literal("Z") {
            return Some(Ok(FixedOffset::east_opt(0)?));
        }
        let sign = match self.rest().chars().next()? {
            '+' => 1,
            '-' => -1,
            _ => return None,
        };
        let start = self.pos;
        self.pos += 1;
        let Some(hours) = self.digits(2, 2) else {
            self.pos = start;
            return None;
        };
        // The colon belongs to the offset only when minutes follow it
        let before_minutes = self.pos;
        self.literal(":");
        let minutes = match self.digits(2, 2) {
            Some(minutes) => minutes,
            None => {
                self.pos = before_minutes;
                0
            }
        };
        let seconds = sign * (hours * 3600 + minutes * 60);
        Some(
            i32::try_from(seconds)
                .ok()
                .and_then(FixedOffset::east_opt)
                .ok_or(DateError::OutOfRange { field: "offset", value: seconds }),
        )
    }
}

fn short_names<const N: usize>(names: &[&'static str; N]) -> [&'static str; N] {
    names.map(|n| &n[..3])
}

/// Walk the pattern over the input, collecting raw components.
fn scan(input: &str, pattern: &DatePattern) -> Result<Fields, DateError> {
    let mut cursor = Cursor { input, pos: 0 };
    let mut fields = Fields::default();

    for token in pattern.tokens() {
        let position = cursor.pos;
        let mismatch = || DateError::Mismatch {
            input: input.to_string(),
            position,
            expected: token.describe(),
        };

        match token {
            Token::Year4 => fields.year = Some(cursor.digits(4, 4).ok_or_else(mismatch)?),
            Token::Year2 => {
                let yy = cursor.digits(2, 2).ok_or_else(mismatch)?;
                fields.year = Some(yy + if yy > 68 { 1900 } else { 2000 });
            }
            Token::MonthName { full } => {
                let index = full
                    .then(|| cursor.name(&MONTH_NAMES))
                    .flatten()
                    .or_else(|| cursor.name(&short_names(&MONTH_NAMES)))
                    .ok_or_else(mismatch)?;
                fields.month = Some(index as i64 + 1);
            }
            Token::Month { .. } => fields.month = Some(cursor.digits(1, 2).ok_or_else(mismatch)?),
            Token::Day { .. } => fields.day = Some(cursor.digits(1, 2).ok_or_else(mismatch)?),
            Token::Weekday { full } => {
                let index = full
                    .then(|| cursor.name(&WEEKDAY_NAMES))
                    .flatten()
                    .or_else(|| cursor.name(&short_names(&WEEKDAY_NAMES)))
                    .ok_or_else(mismatch)?;
                fields.weekday = Weekday::try_from(index as u8).ok();
            }
            Token::Hour24 { .. } | Token::Hour12 { .. } => {
                fields.hour = Some(cursor.digits(1, 2).ok_or_else(mismatch)?);
            }
            Token::Minute { .. } => fields.minute = Some(cursor.digits(1, 2).ok_or_else(mismatch)?),
            Token::Second { .. } => fields.second = Some(cursor.digits(1, 2).ok_or_else(mismatch)?),
            Token::Millisecond => {
                fields.millisecond = Some(cursor.digits(3, 3).ok_or_else(mismatch)?);
            }
            Token::Meridiem { .. } => {
                let index = cursor.name(&["am", "pm"]).ok_or_else(mismatch)?;
                fields.afternoon = Some(index == 1);
            }
            Token::Offset { .. } => {
                fields.offset = Some(cursor.offset().ok_or_else(mismatch)??);
            }
            Token::Literal(text) => {
                if !cursor.literal(text) {
                    return Err(mismatch());
                }
            }
        }
    }

    if !cursor.rest().is_empty() {
        return Err(DateError::TrailingInput(cursor.rest().to_string()));
    }

    Ok(fields)
}
