//! Calendar-date keys.
//!
//! Day-level records (daily schedules, progress entries) are keyed by a
//! `YYYY-MM-DD` date with no timezone attached.
//!
//! # Invariants
//! - "Today" is always derived from the local wall clock, never from UTC.
//! - Keys are rendered and parsed with one format: `%Y-%m-%d`.

use chrono::{Local, NaiveDate};

/// Format used for every persisted calendar date.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Returns the current local calendar date.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses one `YYYY-MM-DD` key. Surrounding whitespace is ignored.
pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_KEY_FORMAT).ok()
}

/// Renders a date as its persisted key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}
