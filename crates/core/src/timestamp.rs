use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike};

/// Renders `yyyyMMdd_HHmmss` with a 24-hour clock.
pub fn format_timestamp(date: &NaiveDateTime) -> String {
    format!(
        "{:04}{:02}{:02}_{:02}{:02}{:02}",
        date.year(),
        date.month(),
        date.day(),
        date.hour(),
        date.minute(),
        date.second()
    )
}

/// Shifts a wall-clock date by whole hours, rolling over day, month and year.
///
/// Returns `None` when the result leaves the representable range.
pub fn adjust_hours(date: NaiveDateTime, hours: i64) -> Option<NaiveDateTime> {
    if hours == 0 {
        return Some(date);
    }
    let delta = TimeDelta::try_hours(hours)?;
    date.checked_add_signed(delta)
}
