use crate::error::{Result, StreakError};
use crate::model::SECONDS_PER_DAY;
use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc};
use std::path::Path;

/// Offset of the local timezone right now.
pub fn local_offset() -> FixedOffset {
    Local::now().offset().fix()
}

pub fn utc() -> FixedOffset {
    Utc.fix()
}

fn to_zoned(timestamp: i64, tz: &FixedOffset) -> Result<DateTime<FixedOffset>> {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.with_timezone(tz))
        .ok_or_else(|| StreakError::InvalidDate(format!("Invalid timestamp: {timestamp}")))
}

/// Seconds elapsed since midnight of the calendar day containing `timestamp`.
pub fn seconds_since_midnight(timestamp: i64, tz: &FixedOffset) -> i64 {
    (timestamp + i64::from(tz.local_minus_utc())).rem_euclid(SECONDS_PER_DAY)
}

/// Timestamp of midnight starting the calendar day containing `timestamp`.
pub fn midnight_of(timestamp: i64, tz: &FixedOffset) -> i64 {
    timestamp - seconds_since_midnight(timestamp, tz)
}

/// Timestamp of midnight starting `date`.
pub fn midnight_for_date(date: NaiveDate, tz: &FixedOffset) -> Result<i64> {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| StreakError::InvalidDate(date.to_string()))?;
    tz.from_local_datetime(&naive)
        .single()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| StreakError::InvalidDate(date.to_string()))
}

pub fn parse_ymd(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| StreakError::InvalidDate(format!("'{input}': {e}")))
}

/// Sunday opening the contribution graph that ends at `now`.
pub fn graph_start(now: i64, tz: &FixedOffset) -> Result<NaiveDate> {
    let year_ago = to_zoned(now, tz)?.date_naive() - Duration::days(364);
    let back = i64::from(year_ago.weekday().num_days_from_sunday());
    Ok(year_ago - Duration::days(back))
}

pub fn format_timestamp(timestamp: i64, tz: &FixedOffset) -> String {
    to_zoned(timestamp, tz)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

/// A repository is only created where nothing exists yet, or in an empty directory.
pub fn ensure_fresh_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    if !path.is_dir() || std::fs::read_dir(path)?.next().is_some() {
        return Err(StreakError::InvalidArgument(format!(
            "{} already exists and is not an empty directory",
            path.display()
        )));
    }
    Ok(())
}
