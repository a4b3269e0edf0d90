//! Date utilities: parsing user-supplied days and building UTC day ranges.

use crate::errors::{AppError, AppResult};
use crate::models::DateRange;
use chrono::{DateTime, NaiveDate, Utc};

/// Parse a calendar day. Accepts `MM/DD/YYYY` (the chat command format) and
/// `YYYY-MM-DD` (the CLI format).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

/// Build an inclusive day range from optional start/end strings.
pub fn parse_range(start: Option<&str>, end: Option<&str>) -> AppResult<DateRange> {
    let parse = |raw: Option<&str>| -> AppResult<Option<NaiveDate>> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => parse_date(s)
                .map(Some)
                .ok_or_else(|| AppError::InvalidDate(s.to_string())),
            None => Ok(None),
        }
    };

    let range = DateRange {
        start: parse(start)?,
        end: parse(end)?,
    };

    if let (Some(s), Some(e)) = (range.start, range.end)
        && s > e
    {
        return Err(AppError::InvalidDateRange(format!(
            "start {} is after end {}",
            s.format("%m/%d/%Y"),
            e.format("%m/%d/%Y")
        )));
    }

    Ok(range)
}

/// Human form of a session, e.g. `January 1, 2024, 00:00 - 02:30 UTC`.
pub fn format_session(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let date_fmt = "%B %-d, %Y";
    let date_part = if start.date_naive() == end.date_naive() {
        start.format(date_fmt).to_string()
    } else {
        format!("{} – {}", start.format(date_fmt), end.format(date_fmt))
    };

    format!(
        "{}, {} - {} UTC",
        date_part,
        start.format("%H:%M"),
        end.format("%H:%M")
    )
}

pub fn format_hours(hours: f64) -> String {
    format!("{:.2}h", hours)
}
