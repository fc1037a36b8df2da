//! Utility functions for vendor date/time normalization.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Parse the vendor's `YYYYMMDD` integer day. `0` and out-of-range values
/// yield `None`.
pub fn parse_vendor_date(value: u32) -> Option<NaiveDate> {
    if value == 0 {
        return None;
    }
    let year = (value / 10_000) as i32;
    let month = (value / 100) % 100;
    let day = value % 100;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Convert a unix timestamp in seconds to UTC. Non-positive values map to
/// the epoch, as the vendor uses `0` for missing start times.
pub fn timestamp_to_utc(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs.max(0), 0).unwrap_or_default()
}

/// Render `YYYY-MM-DD HH:MM` in local time, or just the day when the start
/// time is unknown.
pub fn display_start(date: Option<NaiveDate>, start: DateTime<Utc>) -> String {
    let has_time = start.timestamp() > 0;
    match (date, has_time) {
        (_, true) => start
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        (Some(d), false) => d.format("%Y-%m-%d").to_string(),
        (None, false) => "Unknown".to_string(),
    }
}

/// Seconds as `H:MM:SS`, or `M:SS` under an hour.
pub fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// Metres as kilometres with two decimals.
pub fn format_distance(metres: f64) -> String {
    format!("{:.2} km", metres.max(0.0) / 1000.0)
}
