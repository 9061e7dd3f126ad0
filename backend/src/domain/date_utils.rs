//! Date helpers shared by the aggregation and range picker logic.
//!
//! Upstream systems send timestamps in several shapes (full RFC 3339, naive
//! date-times with or without the `T` separator, bare dates). Everything here
//! is lenient: a value that cannot be understood yields `None` and the caller
//! decides what to skip.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// ISO 8601 forms with an offset that RFC 3339 rejects (minute precision, offset without colon)
const OFFSET_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
];

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp in any of the accepted formats.
///
/// Offsets are kept as written: `2024-01-31T23:30:00+03:00` stays on January 31
/// rather than being converted to UTC.
pub fn parse_flexible_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.naive_local());
        }
    }

    // UTC designator on a form the offset formats did not take
    let naive = value
        .strip_suffix('Z')
        .or_else(|| value.strip_suffix('z'))
        .unwrap_or(value);
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(dt);
        }
    }

    parse_iso_date(value).and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Format a date as `YYYY-MM-DD`
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// First day of the month containing `date`
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the previous month
pub fn previous_month(date: NaiveDate) -> NaiveDate {
    let first = first_day_of_month(date);
    let (year, month) = if first.month() == 1 {
        (first.year() - 1, 12)
    } else {
        (first.year(), first.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(first)
}

/// First day of the next month
pub fn next_month(date: NaiveDate) -> NaiveDate {
    let first = first_day_of_month(date);
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(first)
}

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_day_of_month(date);
    next_month(first)
        .signed_duration_since(first)
        .num_days() as u32
}
