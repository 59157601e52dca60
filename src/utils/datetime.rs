//! Date and time utility functions
//!
//! This module provides human-readable formatting of server timestamps,
//! e.g. "5 minutes ago" for the share button and sidebar items.

use chrono::{DateTime, Local, Utc};

/// Format used for absolute timestamps in tooltips and previews
pub const DISPLAY_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Describe how long ago `time` was relative to `now`
///
/// # Arguments
/// * `time` - The moment to describe
/// * `now` - The reference moment
///
/// # Returns
/// * `String` - "just now", "N minutes ago", "yesterday", ... or a date for
///   anything older than a week. Future times read as "just now".
pub fn format_human_at(time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(time);
    let seconds = elapsed.num_seconds();

    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return plural(minutes, "minute");
    }

    let hours = elapsed.num_hours();
    if hours < 24 {
        return plural(hours, "hour");
    }

    match elapsed.num_days() {
        1 => "yesterday".to_string(),
        days @ 2..=6 => format!("{days} days ago"),
        _ => format_local(time),
    }
}

/// Describe how long ago `time` was relative to the current time
pub fn format_human(time: DateTime<Utc>) -> String {
    format_human_at(time, Utc::now())
}

/// Format a timestamp in local time
pub fn format_local(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format(DISPLAY_DATETIME_FORMAT).to_string()
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}
