//! Calendar date parsing and rendering
//!
//! Exercise dates carry no time of day. Input is accepted in the handful of
//! shapes clients actually send; output is always the fixed calendar string
//! (`Sun Jan 15 2023`).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Rendering used for every date leaving the service
const CALENDAR_FORMAT: &str = "%a %b %d %Y";

/// Plain-date layouts tried after the timestamp formats
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    CALENDAR_FORMAT,
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Zone-less date-times (`datetime-local` inputs); the time of day is dropped
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse user supplied text into a calendar date
///
/// Returns `None` when the text matches none of the accepted layouts or names
/// a day that does not exist (`2023-02-30`).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc2822(text) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            DATETIME_FORMATS.iter().find_map(|format| {
                NaiveDateTime::parse_from_str(text, format)
                    .ok()
                    .map(|datetime| datetime.date())
            })
        })
}

/// Render a date as a calendar string, e.g. `Mon Jan 01 2024`
pub fn to_calendar_string(date: NaiveDate) -> String {
    date.format(CALENDAR_FORMAT).to_string()
}

/// Current calendar date (UTC)
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_date("2023-01-15"), Some(ymd(2023, 1, 15)));
        assert_eq!(parse_date("  2023-01-15  "), Some(ymd(2023, 1, 15)));
        assert_eq!(parse_date("2023/01/15"), Some(ymd(2023, 1, 15)));
        assert_eq!(parse_date("01/15/2023"), Some(ymd(2023, 1, 15)));
        assert_eq!(parse_date("2023-01-15T10:00:00"), Some(ymd(2023, 1, 15)));
        assert_eq!(parse_date("2023-01-15T23:59"), Some(ymd(2023, 1, 15)));
        assert_eq!(parse_date("2023-01-15 10:00:00"), Some(ymd(2023, 1, 15)));
        assert_eq!(parse_date("2023-01-15 10:00"), Some(ymd(2023, 1, 15)));
    }

    #[test]
    fn test_parse_timestamps_use_utc_day() {
        assert_eq!(parse_date("2023-01-15T10:30:00Z"), Some(ymd(2023, 1, 15)));
        assert_eq!(
            parse_date("2023-01-15T23:30:00-02:00"),
            Some(ymd(2023, 1, 16))
        );
        assert_eq!(
            parse_date("Sun, 15 Jan 2023 08:00:00 +0000"),
            Some(ymd(2023, 1, 15))
        );
    }

    #[test]
    fn test_parse_calendar_and_long_forms() {
        assert_eq!(parse_date("Sun Jan 15 2023"), Some(ymd(2023, 1, 15)));
        assert_eq!(parse_date("January 15, 2023"), Some(ymd(2023, 1, 15)));
        assert_eq!(parse_date("Jan 15, 2023"), Some(ymd(2023, 1, 15)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("2023-02-30"), None);
        assert_eq!(parse_date("2023-13-01"), None);
        // weekday disagrees with the date
        assert_eq!(parse_date("Mon Jan 15 2023"), None);
        assert_eq!(parse_date("2023-01-15T25:00"), None);
        assert_eq!(parse_date("13/15/2023"), None);
    }

    #[test]
    fn test_calendar_string() {
        assert_eq!(to_calendar_string(ymd(2023, 1, 15)), "Sun Jan 15 2023");
        assert_eq!(to_calendar_string(ymd(2024, 1, 1)), "Mon Jan 01 2024");
    }

    #[test]
    fn test_calendar_string_parses_back() {
        let date = ymd(2020, 2, 29);
        assert_eq!(parse_date(&to_calendar_string(date)), Some(date));
    }
}
