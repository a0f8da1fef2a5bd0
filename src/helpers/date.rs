//! Date helper functions

use chrono::{DateTime, Datelike, TimeZone, Utc};

/// Format a publication date as `d LLL yyyy`, e.g. "15 mar 2021"
///
/// `months` holds the twelve abbreviated month names of the display locale.
pub fn publication_date<Tz: TimeZone>(date: &DateTime<Utc>, tz: &Tz, months: &[String]) -> String {
    let local = date.with_timezone(tz);
    let month = months
        .get(local.month0() as usize)
        .cloned()
        .unwrap_or_else(|| format!("{:02}", local.month()));
    format!("{} {} {}", local.day(), month, local.year())
}

/// Format a date in ISO 8601 / XML format, for `<time datetime>`
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}
