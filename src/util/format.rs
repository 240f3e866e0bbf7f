//! Timestamp display formatting.
//!
//! Output follows the panel's Russian locale: day, genitive month name, year,
//! then a two-digit 24h time, e.g. `1 января 2024 г. в 10:00`.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, Timelike};

/// Shown for absent or empty timestamps.
pub const EMPTY_PLACEHOLDER: &str = "-";

/// What the browser's date parser renders for garbage input.
pub const INVALID_DATE: &str = "Invalid Date";

const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Format a timestamp string for display.
pub fn format_date(value: Option<&str>) -> String {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return EMPTY_PLACEHOLDER.to_owned();
    };
    match parse_local(value) {
        Some(dt) => format_local(dt),
        None => INVALID_DATE.to_owned(),
    }
}

/// Render an already-local wall-clock time.
#[must_use]
pub fn format_local(dt: NaiveDateTime) -> String {
    let month = MONTHS_GENITIVE[dt.month0() as usize];
    format!("{} {month} {} г. в {:02}:{:02}", dt.day(), dt.year(), dt.hour(), dt.minute())
}

/// Offset-carrying forms without seconds, which RFC 3339 parsing rejects.
const OFFSET_MINUTE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M%z"];

/// Parse into local wall-clock time.
///
/// Offset-carrying timestamps (including a bare `Z` suffix) are converted to
/// the local zone, naive date-times are taken as local already, and bare
/// dates mean UTC midnight.
fn parse_local(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Some(dt) = OFFSET_MINUTE_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
    {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Some(utc) = value.strip_suffix(['Z', 'z']) {
        return parse_naive(utc).map(|dt| dt.and_utc().with_timezone(&Local).naive_local());
    }
    if let Some(dt) = parse_naive(value) {
        return Some(dt);
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(midnight.and_utc().with_timezone(&Local).naive_local())
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}
