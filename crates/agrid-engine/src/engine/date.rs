//! Date coercion for date-typed columns and date filters.
//!
//! Cells rarely hold a typed [`Value::Date`]; most datasets carry dates as
//! text or as epoch milliseconds. [`parse_date`] accepts all three and yields
//! `None` for anything it cannot read, which callers treat as "skip".

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::value::Value;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%m/%d/%Y"];

/// Coerce a cell value to a date-time.
///
/// - `Date` is returned as-is
/// - `Number` is read as Unix epoch milliseconds
/// - `Text` is tried as RFC 3339, then the common date-time and date layouts
pub fn parse_date(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Number(ms) if ms.is_finite() => {
            DateTime::from_timestamp_millis(*ms as i64).map(|d| d.naive_utc())
        }
        Value::Text(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        // Keep the wall-clock time written in the text.
        return Some(d.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(d) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(chrono::NaiveTime::MIN));
        }
    }
    None
}

/// Milliseconds since the Unix epoch, treating the date-time as UTC.
pub fn timestamp_millis(date: &NaiveDateTime) -> i64 {
    date.and_utc().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_plain_dates() {
        let expected = ymd(2024, 3, 1).and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(parse_date(&Value::from("2024-03-01")), Some(expected));
        assert_eq!(parse_date(&Value::from("01.03.2024")), Some(expected));
        assert_eq!(parse_date(&Value::from("03/01/2024")), Some(expected));
    }

    #[test]
    fn test_parse_date_times() {
        let expected = ymd(2024, 3, 1).and_hms_opt(13, 45, 0).unwrap();
        assert_eq!(parse_date(&Value::from("2024-03-01 13:45:00")), Some(expected));
        assert_eq!(parse_date(&Value::from("2024-03-01T13:45")), Some(expected));
        assert_eq!(
            parse_date(&Value::from("2024-03-01T13:45:00+05:00")),
            Some(expected)
        );
    }

    #[test]
    fn test_parse_epoch_millis() {
        let parsed = parse_date(&Value::from(86_400_000.0)).unwrap();
        assert_eq!(parsed.date(), ymd(1970, 1, 2));
        assert_eq!(timestamp_millis(&parsed), 86_400_000);
    }

    #[test]
    fn test_unparseable_values() {
        assert_eq!(parse_date(&Value::from("not a date")), None);
        assert_eq!(parse_date(&Value::from("")), None);
        assert_eq!(parse_date(&Value::Null), None);
        assert_eq!(parse_date(&Value::from(true)), None);
        assert_eq!(parse_date(&Value::from(f64::NAN)), None);
    }
}
