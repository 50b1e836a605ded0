//! Calendar helpers for ISO-8601 inputs and month arithmetic

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime};

use crate::error::{ForecastError, Result};

/// Parse an ISO-8601 date or date-time string into a calendar date
///
/// Accepts `2024-03-01`, `2024-03-01T09:30:00` and RFC 3339 timestamps such as
/// `2024-03-01T09:30:00.000Z`. Time and offset are discarded.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();

    if let Ok(date) = trimmed.parse::<NaiveDate>() {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = trimmed.parse::<NaiveDateTime>() {
        return Ok(dt.date());
    }

    Err(ForecastError::InvalidDate(format!(
        "'{}' is not an ISO-8601 date",
        input
    )))
}

/// Add whole calendar months, clamping the day to the end of shorter months
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months)).ok_or_else(|| {
        ForecastError::InvalidDate(format!("{} + {} months is out of range", date, months))
    })
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // Day 1 always exists
    date.with_day(1).unwrap_or(date)
}

/// Number of calendar months touched by the inclusive range `[start, end]`
pub fn months_spanned(start: NaiveDate, end: NaiveDate) -> u32 {
    if end < start {
        return 0;
    }
    let years = end.year() - start.year();
    let months = years * 12 + end.month() as i32 - start.month() as i32;
    (months + 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse_iso_date("2024-03-01").unwrap(), ymd(2024, 3, 1));
    }

    #[test]
    fn test_parse_timestamps() {
        assert_eq!(parse_iso_date("2024-03-01T09:30:00.000Z").unwrap(), ymd(2024, 3, 1));
        assert_eq!(parse_iso_date("2024-03-01T09:30:00").unwrap(), ymd(2024, 3, 1));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_iso_date("next tuesday"),
            Err(ForecastError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(ymd(2024, 1, 31), 1).unwrap(), ymd(2024, 2, 29));
        assert_eq!(add_months(ymd(2024, 11, 15), 3).unwrap(), ymd(2025, 2, 15));
        assert_eq!(add_months(ymd(2024, 5, 1), 0).unwrap(), ymd(2024, 5, 1));
    }

    #[test]
    fn test_months_spanned() {
        assert_eq!(months_spanned(ymd(2024, 1, 1), ymd(2024, 12, 31)), 12);
        assert_eq!(months_spanned(ymd(2024, 6, 10), ymd(2024, 6, 20)), 1);
        assert_eq!(months_spanned(ymd(2024, 6, 10), ymd(2024, 5, 20)), 0);
    }
}
