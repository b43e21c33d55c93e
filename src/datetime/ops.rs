//! Comparisons and string-level helpers built on parse/format

use super::parse::DateParser;
use super::render::format;
use super::{DateError, DateValue, TimeUnit};
use chrono::{NaiveDate, TimeDelta};

/// True if `target` falls within `[now - days_before, now + days_after]`, comparing
/// calendar days only.
///
/// Either bound may be negative, which shifts that edge past "today": `(3650, -1)` accepts
/// only dates before today (within ten years), `(-1, 3650)` only dates after it.
pub fn is_within_range(target: &DateValue, days_before: i64, days_after: i64, now: &DateValue) -> bool {
    let today = now.date();
    let start = shift_days(today, days_before.saturating_neg());
    let end = shift_days(today, days_after);
    let day = target.date();
    start <= day && day <= end
}

/// Move `date` by `days`, saturating at the ends of the representable range.
fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    let limit = if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX };
    TimeDelta::try_days(days).and_then(|d| date.checked_add_signed(d)).unwrap_or(limit)
}

/// True if `target` is on a calendar day strictly before `now`'s.
pub fn is_before(target: &DateValue, now: &DateValue) -> bool {
    target.date() < now.date()
}

/// True if `target` is on a calendar day strictly after `now`'s.
pub fn is_after(target: &DateValue, now: &DateValue) -> bool {
    target.date() > now.date()
}

/// Parse both strings under `format` and compare the resulting instants exactly.
///
/// Either side failing to parse makes the dates unequal.
///
/// ```
/// use pagecheck::datetime::is_same;
///
/// assert!(is_same("05/14/2025", "05/14/2025", "MM/DD/YYYY"));
/// assert!(!is_same("05/14/2025", "05/15/2025", "MM/DD/YYYY"));
/// ```
pub fn is_same(date1: &str, date2: &str, format: &str) -> bool {
    let parser = DateParser::lenient();
    match (parser.parse(date1, format), parser.parse(date2, format)) {
        (Ok(a), Ok(b)) => a.same_instant(&b),
        _ => false,
    }
}

/// Strict validation: the string must exist on the calendar and match `format` exactly.
///
/// ```
/// use pagecheck::datetime::is_valid_date;
///
/// assert!(is_valid_date("05/14/2025", "MM/DD/YYYY"));
/// assert!(!is_valid_date("02/30/2025", "MM/DD/YYYY"));
/// ```
pub fn is_valid_date(date: &str, format: &str) -> bool {
    match DateParser::strict().parse(date, format) {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!(date, format, error = %e, "invalid date");
            false
        }
    }
}

/// Re-render a date string from one format into another.
///
/// ```
/// use pagecheck::datetime::convert_format;
///
/// assert_eq!(convert_format("14-05-2025", "DD-MM-YYYY", "MM/DD/YYYY").unwrap(), "05/14/2025");
/// ```
pub fn convert_format(date: &str, from: &str, to: &str) -> Result<String, DateError> {
    let value = DateParser::lenient().parse(date, from)?;
    Ok(format(&value, to))
}

/// Today's date rendered in `format`.
pub fn current_date(format_str: &str) -> String {
    format(&DateValue::now(), format_str)
}

/// The current date and time rendered in `format`.
///
/// Same as [`current_date`]; the pattern decides whether time fields appear.
pub fn current_date_time(format_str: &str) -> String {
    current_date(format_str)
}

/// Today shifted by `days` (negative for the past), rendered in `format`.
pub fn add_days_to_current_date(days: i64, format_str: &str) -> String {
    format(&DateValue::now().add(days, TimeUnit::Day), format_str)
}

/// Parse, shift by `amount` of `unit`, and render back in the same format.
///
/// ```
/// use pagecheck::datetime::{adjust_date, TimeUnit};
///
/// assert_eq!(adjust_date("05/14/2025", "MM/DD/YYYY", 2, TimeUnit::Month).unwrap(), "07/14/2025");
/// ```
pub fn adjust_date(date: &str, format_str: &str, amount: i64, unit: TimeUnit) -> Result<String, DateError> {
    let value = DateParser::lenient().parse(date, format_str)?;
    Ok(format(&value.add(amount, unit), format_str))
}

/// [`is_within_range`] over a date string, relative to `now`. Unparseable input is out of range.
pub fn is_date_within_range(
    date: &str,
    format_str: &str,
    days_before: i64,
    days_after: i64,
    now: &DateValue,
) -> bool {
    DateParser::lenient()
        .with_reference(now.date())
        .parse(date, format_str)
        .map(|target| is_within_range(&target, days_before, days_after, now))
        .unwrap_or(false)
}

/// [`is_date_within_range`] relative to the current local time.
pub fn is_date_within_range_from_today(date: &str, format_str: &str, days_before: i64, days_after: i64) -> bool {
    is_date_within_range(date, format_str, days_before, days_after, &DateValue::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::parse;

    fn ymd(y: i32, m: u32, d: u32) -> DateValue {
        DateValue::from_ymd(y, m, d).expect("valid test date")
    }

    fn noon(y: i32, m: u32, d: u32) -> DateValue {
        DateValue::from_ymd(y, m, d).expect("valid test date").add(12, TimeUnit::Hour)
    }

    #[test]
    fn test_today_in_zero_window() {
        let now = noon(2025, 5, 14);
        assert!(is_within_range(&ymd(2025, 5, 14), 0, 0, &now));
    }

    #[test]
    fn test_time_of_day_is_ignored() {
        let now = ymd(2025, 5, 14);
        assert!(is_within_range(&noon(2025, 5, 14).add(11, TimeUnit::Hour), 0, 0, &now));
    }

    #[test]
    fn test_ten_days_ago_outside_two_day_window() {
        let now = ymd(2025, 5, 14);
        let target = now.add(-10, TimeUnit::Day);
        assert!(!is_within_range(&target, 2, 0, &now));
        assert!(is_within_range(&target, 10, 0, &now));
    }

    #[test]
    fn test_window_edges_are_inclusive() {
        let now = ymd(2025, 5, 14);
        assert!(is_within_range(&ymd(2025, 5, 12), 2, 3, &now));
        assert!(is_within_range(&ymd(2025, 5, 17), 2, 3, &now));
        assert!(!is_within_range(&ymd(2025, 5, 11), 2, 3, &now));
        assert!(!is_within_range(&ymd(2025, 5, 18), 2, 3, &now));
    }

    #[test]
    fn test_legacy_before_overload() {
        let now = ymd(2025, 5, 14);
        assert!(is_within_range(&ymd(2025, 5, 13), 3650, -1, &now));
        assert!(!is_within_range(&ymd(2025, 5, 14), 3650, -1, &now));
        // The horizon cuts off very old dates; the explicit comparison does not
        assert!(!is_within_range(&ymd(2000, 1, 1), 3650, -1, &now));
        assert!(is_before(&ymd(2000, 1, 1), &now));
    }

    #[test]
    fn test_legacy_after_overload() {
        let now = ymd(2025, 5, 14);
        assert!(is_within_range(&ymd(2025, 5, 15), -1, 3650, &now));
        assert!(!is_within_range(&ymd(2025, 5, 14), -1, 3650, &now));
        assert!(is_after(&ymd(2025, 5, 15), &now));
        assert!(!is_after(&ymd(2025, 5, 14), &now));
    }

    #[test]
    fn test_huge_bounds_saturate() {
        let now = ymd(2025, 5, 14);
        assert!(is_within_range(&ymd(1, 1, 1), i64::MAX, i64::MAX, &now));
        assert!(!is_within_range(&ymd(9999, 12, 31), i64::MIN, i64::MAX, &now));
    }

    #[test]
    fn test_is_same() {
        assert!(is_same("05/14/2025", "05/14/2025", "MM/DD/YYYY"));
        assert!(!is_same("05/14/2025", "05/15/2025", "MM/DD/YYYY"));
        assert!(!is_same("garbage", "garbage", "MM/DD/YYYY"));
    }

    #[test]
    fn test_is_same_compares_time() {
        let f = "MM/DD/YYYY HH:mm";
        assert!(!is_same("05/14/2025 10:00", "05/14/2025 10:01", f));
        // Lenient parsing: 24:00 is midnight of the next day
        assert!(is_same("05/14/2025 24:00", "05/15/2025 00:00", f));
    }

    #[test]
    fn test_is_same_offsets() {
        let f = "YYYY-MM-DDTHH:mm:ssZ";
        assert!(is_same("2025-05-14T20:15:00+05:30", "2025-05-14T14:45:00+00:00", f));
    }

    #[test]
    fn test_is_valid_date() {
        assert!(is_valid_date("05/14/2025", "MM/DD/YYYY"));
        assert!(!is_valid_date("02/30/2025", "MM/DD/YYYY"));
        assert!(!is_valid_date("5/14/2025", "MM/DD/YYYY"));
        assert!(!is_valid_date("", "MM/DD/YYYY"));
    }

    #[test]
    fn test_convert_format_error() {
        assert!(convert_format("not a date", "DD-MM-YYYY", "MM/DD/YYYY").is_err());
    }

    #[test]
    fn test_adjust_date_month_end() {
        assert_eq!(
            adjust_date("01/31/2025", "MM/DD/YYYY", 1, TimeUnit::Month).expect("valid"),
            "02/28/2025"
        );
        assert_eq!(
            adjust_date("03/01/2025", "MM/DD/YYYY", -1, TimeUnit::Day).expect("valid"),
            "02/28/2025"
        );
    }

    #[test]
    fn test_is_date_within_range_string() {
        let now = ymd(2025, 5, 14);
        assert!(is_date_within_range("05/16/2025", "MM/DD/YYYY", 2, 3, &now));
        assert!(!is_date_within_range("05/20/2025", "MM/DD/YYYY", 2, 3, &now));
        assert!(!is_date_within_range("nonsense", "MM/DD/YYYY", 2, 3, &now));
    }

    #[test]
    fn test_current_date_round_trips() {
        let today = current_date("MM/DD/YYYY");
        assert!(parse(&today, "MM/DD/YYYY", true).is_ok());
    }

    #[test]
    fn test_current_date_time_includes_time_fields() {
        let f = "YYYY-MM-DD HH:mm:ss";
        let now = parse(&current_date_time(f), f, true).expect("renders a valid datetime");
        assert_eq!(now.date(), DateValue::now().date());
    }

    #[test]
    fn test_add_days_to_current_date() {
        let f = "YYYY-MM-DD";
        let today = parse(&current_date(f), f, true).expect("valid date");
        assert_eq!(add_days_to_current_date(1, f), format(&today.add(1, TimeUnit::Day), f));
        assert_eq!(add_days_to_current_date(-40, f), format(&today.add(-40, TimeUnit::Day), f));
        assert_eq!(add_days_to_current_date(0, f), current_date(f));
    }

    #[test]
    fn test_is_date_within_range_from_today() {
        let f = "MM/DD/YYYY";
        let three_days_ago = add_days_to_current_date(-3, f);
        assert!(is_date_within_range_from_today(&three_days_ago, f, 3, 0));
        assert!(!is_date_within_range_from_today(&three_days_ago, f, 2, 0));
        assert!(is_date_within_range_from_today(&current_date(f), f, 0, 0));
        assert!(!is_date_within_range_from_today("garbage", f, 3650, 3650));
    }
}
