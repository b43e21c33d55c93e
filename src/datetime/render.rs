//! Rendering date values through a pattern

use super::pattern::{DatePattern, Token};
use super::DateValue;
use chrono::{Datelike, FixedOffset, Local, Offset, TimeZone, Timelike};

pub(crate) const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Weekday names indexed by `Weekday::num_days_from_monday`.
pub(crate) const WEEKDAY_NAMES: [&str; 7] =
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

/// Render a date through a format pattern.
///
/// ```
/// use pagecheck::datetime::{format, DateValue};
///
/// let date = DateValue::from_ymd(2025, 5, 14).unwrap();
/// assert_eq!(format(&date, "MMM DD, YYYY"), "May 14, 2025");
/// assert_eq!(format(&date, "dddd [the] D"), "Wednesday the 14");
/// ```
pub fn format(date: &DateValue, pattern: &str) -> String {
    render(date, &DatePattern::compile(pattern))
}

pub(crate) fn render(date: &DateValue, pattern: &DatePattern) -> String {
    let dt = date.datetime();
    let mut out = String::new();

    for token in pattern.tokens() {
        match token {
            Token::Year4 => out.push_str(&format!("{:04}", dt.year())),
            Token::Year2 => out.push_str(&format!("{:02}", dt.year().rem_euclid(100))),
            Token::MonthName { full } => {
                out.push_str(name(MONTH_NAMES[dt.month0() as usize], *full));
            }
            Token::Month { padded } => push_number(&mut out, dt.month(), *padded),
            Token::Day { padded } => push_number(&mut out, dt.day(), *padded),
            Token::Weekday { full } => {
                let index = dt.weekday().num_days_from_monday() as usize;
                out.push_str(name(WEEKDAY_NAMES[index], *full));
            }
            Token::Hour24 { padded } => push_number(&mut out, dt.hour(), *padded),
            Token::Hour12 { padded } => {
                let hour = match dt.hour() % 12 {
                    0 => 12,
                    h => h,
                };
                push_number(&mut out, hour, *padded);
            }
            Token::Minute { padded } => push_number(&mut out, dt.minute(), *padded),
            Token::Second { padded } => push_number(&mut out, dt.second(), *padded),
            Token::Millisecond => {
                out.push_str(&format!("{:03}", dt.nanosecond() / 1_000_000 % 1000));
            }
            Token::Meridiem { upper } => {
                let text = match (dt.hour() < 12, upper) {
                    (true, true) => "AM",
                    (true, false) => "am",
                    (false, true) => "PM",
                    (false, false) => "pm",
                };
                out.push_str(text);
            }
            Token::Offset { colon } => {
                let offset = date.offset().unwrap_or_else(|| local_offset(date));
                out.push_str(&offset_text(offset, *colon));
            }
            Token::Literal(text) => out.push_str(text),
        }
    }

    out
}

fn name(full_name: &'static str, full: bool) -> &'static str {
    if full {
        full_name
    } else {
        &full_name[..3]
    }
}

fn push_number(out: &mut String, value: u32, padded: bool) {
    if padded {
        out.push_str(&format!("{:02}", value));
    } else {
        out.push_str(&value.to_string());
    }
}

/// Offset of the local time zone at the value's wall-clock time.
fn local_offset(date: &DateValue) -> FixedOffset {
    Local
        .offset_from_local_datetime(&date.datetime())
        .earliest()
        .map(|o| o.fix())
        .unwrap_or_else(|| Local::now().offset().fix())
}

pub(crate) fn offset_text(offset: FixedOffset, colon: bool) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.unsigned_abs() / 60;
    if colon {
        format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
    } else {
        format!("{}{:02}{:02}", sign, minutes / 60, minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateValue {
        let dt = NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, s))
            .expect("valid test datetime");
        DateValue::new(dt)
    }

    #[test]
    fn test_full_date() {
        assert_eq!(format(&at(2025, 5, 14, 0, 0, 0), "MM/DD/YYYY"), "05/14/2025");
        assert_eq!(format(&at(2025, 5, 14, 0, 0, 0), "YYYY-MM-DD"), "2025-05-14");
    }

    #[test]
    fn test_unpadded() {
        assert_eq!(format(&at(2025, 5, 4, 7, 5, 9), "M/D/YY H:m:s"), "5/4/25 7:5:9");
    }

    #[test]
    fn test_twelve_hour_clock() {
        assert_eq!(format(&at(2025, 5, 14, 20, 15, 0), "hh:mm A"), "08:15 PM");
        assert_eq!(format(&at(2025, 5, 14, 0, 5, 0), "h:mm a"), "12:05 am");
        assert_eq!(format(&at(2025, 5, 14, 12, 0, 0), "h A"), "12 PM");
    }

    #[test]
    fn test_names() {
        let date = at(2025, 9, 7, 0, 0, 0);
        assert_eq!(format(&date, "MMMM"), "September");
        assert_eq!(format(&date, "MMM"), "Sep");
        assert_eq!(format(&date, "dddd"), "Sunday");
        assert_eq!(format(&date, "ddd"), "Sun");
    }

    #[test]
    fn test_explicit_offset() {
        let dt = at(2025, 5, 14, 20, 15, 0).datetime();
        let offset = FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("valid offset");
        let date = DateValue::with_offset(dt, offset);
        assert_eq!(format(&date, "YYYY-MM-DDTHH:mm:ssZ"), "2025-05-14T20:15:00+05:30");
        assert_eq!(format(&date, "ZZ"), "+0530");
    }

    #[test]
    fn test_negative_offset_text() {
        let offset = FixedOffset::west_opt(3 * 3600 + 30 * 60).expect("valid offset");
        assert_eq!(offset_text(offset, true), "-03:30");
    }

    #[test]
    fn test_millis_and_escapes() {
        let date = DateValue::new(
            NaiveDate::from_ymd_opt(2025, 5, 14)
                .and_then(|d| d.and_hms_milli_opt(1, 2, 3, 45))
                .expect("valid test datetime"),
        );
        assert_eq!(format(&date, "ss.SSS [ms]"), "03.045 ms");
    }
}
