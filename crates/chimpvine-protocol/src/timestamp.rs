//! Local wall-clock timestamps for reports.
//!
//! The backend stores the player's local time as a plain string with no
//! zone offset, so we format `chrono::Local` rather than UTC.

use chrono::{Local, NaiveDateTime};

/// `strftime` pattern for report timestamps: `YYYY-MM-DD HH:MM:SS`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats `at` the way reports expect.
pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// The current local time, formatted for a report.
pub fn local_timestamp() -> String {
    format_timestamp(&Local::now().naive_local())
}
