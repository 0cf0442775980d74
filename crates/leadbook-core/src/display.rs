//! Display formatting for dates, times and reminder lead times.
//!
//! Nothing here is stored; these strings exist only for presentation.

use std::fmt::Display;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};

use crate::models::REMINDER_DAY_OPTIONS;

/// Describe `date` relative to `today`: "Today", "Tomorrow", "Yesterday",
/// "In N days" or "N days ago".
pub fn relative_day_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        n if n > 1 => format!("In {n} days"),
        n => format!("{} days ago", n.unsigned_abs()),
    }
}

/// "05 Jun 2024"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

/// 12-hour clock: "2:05 PM", "12:00 AM".
pub fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// "05 Jun 2024, 02:05 PM" in the timezone `dt` carries.
pub fn format_datetime<Tz>(dt: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    dt.format("%d %b %Y, %I:%M %p").to_string()
}

pub fn reminder_label(days: u32) -> String {
    REMINDER_DAY_OPTIONS
        .iter()
        .find(|(d, _)| *d == days)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| format!("{days} days before"))
}
