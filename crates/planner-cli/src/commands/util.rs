//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

/// Pre-compiled regex for local date-times without an offset.
static LOCAL_DATETIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})(?:[T ](\d{1,2}):(\d{2})(?::(\d{2}))?)?$").unwrap()
});

/// Time assumed for a deadline given as a bare date.
const END_OF_DAY: (u32, u32, u32) = (23, 59, 0);

/// Parse a date-time argument as local wall-clock time.
///
/// Supports:
/// - RFC 3339: "2025-03-07T23:59:00-05:00" (converted to local time)
/// - Local: "2025-03-07T23:59", "2025-03-07 23:59:30"
/// - Date only: "2025-03-07" (23:59 that day)
pub fn parse_datetime(s: &str) -> anyhow::Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }

    let Some(caps) = LOCAL_DATETIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use RFC 3339 (e.g., 2025-03-07T23:59:00Z) or local time (e.g., 2025-03-07T23:59)"
        );
    };

    let date = parse_date(&caps[1])?;
    let (hour, minute, second) = match caps.get(2) {
        None => END_OF_DAY,
        Some(hour) => (
            hour.as_str().parse().context("failed to parse hour")?,
            caps[3].parse().context("failed to parse minute")?,
            caps.get(4)
                .map_or(Ok(0), |s| s.as_str().parse())
                .context("failed to parse second")?,
        ),
    };
    let time = NaiveTime::from_hms_opt(hour, minute, second)
        .with_context(|| format!("Invalid time of day in {s}"))?;
    Ok(date.and_time(time))
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date: {s}. Use YYYY-MM-DD"))
}

/// Format a day heading, e.g. "Mon 2025-03-03".
pub fn format_day(day: NaiveDate) -> String {
    day.format("%a %Y-%m-%d").to_string()
}

/// Format a local timestamp to the minute.
pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}
