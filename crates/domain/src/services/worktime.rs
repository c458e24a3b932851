//! Work-time derivation.
//!
//! Everything here is pure: callers inject `now`, nothing reads the wall
//! clock, so every derivation is testable against fixed instants.

use chrono::{DateTime, Utc};

use crate::models::AttendanceRecord;

/// Whole minutes between login and logout, truncated (never rounded up).
pub fn worked_minutes(login: DateTime<Utc>, logout: DateTime<Utc>) -> i64 {
    (logout - login).num_minutes().max(0)
}

/// Minutes worked so far on `record` as of `now`.
///
/// While checked in this runs against `now`; once checked out it is the
/// final login→logout span. `None` before the first punch-in.
pub fn elapsed_minutes(record: &AttendanceRecord, now: DateTime<Utc>) -> Option<i64> {
    let login = record.login_time?;
    let end = record.logout_time.unwrap_or(now);
    Some(worked_minutes(login, end))
}

/// Renders a minute count as a compact label: `"8h 29m"`, `"45m"`, `"8h"`,
/// and `"0h"` for zero.
pub fn format_minutes(total_minutes: i64) -> String {
    let total_minutes = total_minutes.max(0);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    match (hours, minutes) {
        (0, 0) => "0h".to_string(),
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Convenience: the display label for a record as of `now`.
pub fn worked_label(record: &AttendanceRecord, now: DateTime<Utc>) -> Option<String> {
    elapsed_minutes(record, now).map(format_minutes)
}
