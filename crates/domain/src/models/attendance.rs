//! Attendance domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Backend-assigned day classification.
///
/// Computed by the attendance service, never by this client; carried for
/// display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    OnTime,
    Late,
    HalfDay,
    #[default]
    Unset,
}

impl<'de> serde::Deserialize<'de> for AttendanceStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Unknown classifications must not fail a record fetch; the field is
        // display-only.
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "on-time" => AttendanceStatus::OnTime,
            "late" => AttendanceStatus::Late,
            "half-day" => AttendanceStatus::HalfDay,
            _ => AttendanceStatus::Unset,
        })
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::OnTime => write!(f, "On Time"),
            AttendanceStatus::Late => write!(f, "Late"),
            AttendanceStatus::HalfDay => write!(f, "Half Day"),
            AttendanceStatus::Unset => write!(f, "—"),
        }
    }
}

/// One calendar day's attendance for a user. Server-owned; read-only here.
///
/// Invariant (enforced by the backend): `logout_time` set implies
/// `login_time` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub login_time: Option<DateTime<Utc>>,
    pub logout_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attendance_status: AttendanceStatus,
}

impl AttendanceRecord {
    /// Punched in and not yet out.
    pub fn is_checked_in(&self) -> bool {
        self.login_time.is_some() && self.logout_time.is_none()
    }

    /// Punched in and out.
    pub fn is_checked_out(&self) -> bool {
        self.login_time.is_some() && self.logout_time.is_some()
    }
}

/// Filter set for record history fetches.
///
/// `user_id` is honored only by the admin endpoints.
#[derive(Debug, Clone, Default)]
pub struct RecordsQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
    pub user_id: Option<Uuid>,
}

impl RecordsQuery {
    /// Renders the set filters as wire query pairs (camelCase keys).
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = self.start_date {
            pairs.push(("startDate", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(status) = self.status {
            let wire = match status {
                AttendanceStatus::OnTime => "on-time",
                AttendanceStatus::Late => "late",
                AttendanceStatus::HalfDay => "half-day",
                AttendanceStatus::Unset => "unset",
            };
            pairs.push(("status", wire.to_string()));
        }
        if let Some(user_id) = self.user_id {
            pairs.push(("userId", user_id.to_string()));
        }
        pairs
    }
}
