use super::encode::PixelClock;
use crate::error::{Result, StreakError};
use crate::util::midnight_for_date;
use chrono::{FixedOffset, NaiveDate};
use tracing::debug;

fn component(value: &str, line: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| StreakError::Parse(format!("'{value}' is not a number in '{line}'")))
}

/// Timestamps for a dates file: one `day:month:year` per line.
///
/// Lines that do not have three components are skipped. Each date is stamped
/// at its midnight in `tz` plus the next tick of `clock`.
pub fn read_dates(text: &str, tz: &FixedOffset, clock: &mut PixelClock) -> Result<Vec<i64>> {
    let mut dates = Vec::new();

    for (number, line) in text.lines().enumerate() {
        let parts: Vec<&str> = line.trim().split(':').collect();
        let [day, month, year] = parts.as_slice() else {
            debug!(line = number + 1, "skipping line without three components");
            continue;
        };

        let day = component(day, line)?;
        let month = component(month, line)?;
        let year = component(year, line)?;
        let year = i32::try_from(year)
            .map_err(|_| StreakError::InvalidDate(format!("year {year} out of range")))?;
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| StreakError::InvalidDate(format!("'{}' is not a calendar date", line.trim())))?;

        dates.push(midnight_for_date(date, tz)? + clock.tick());
    }

    Ok(dates)
}
