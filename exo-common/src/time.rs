//! Timestamp utilities

use chrono::{DateTime, Local, TimeZone, Utc};

/// Format used in archive file names, e.g. `2025_03_25_142233`
pub const ARCHIVE_STAMP_FORMAT: &str = "%Y_%m_%d_%H%M%S";

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Render a timestamp as an archive file name suffix
///
/// Archives are named after the operator's wall clock, so the stamp is
/// rendered in whatever zone the caller passes (usually `Local`).
pub fn archive_stamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(ARCHIVE_STAMP_FORMAT).to_string()
}

/// Archive stamp for the current local time
pub fn archive_stamp_now() -> String {
    archive_stamp(&Local::now())
}
