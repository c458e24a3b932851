//! Monthly and team summary aggregates. Server-owned; re-fetched on every
//! month/year change, never cached client-side.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::worktime;

/// Aggregate attendance figures for one (month, year) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub month: u32,
    pub year: i32,
    pub days_worked: u32,
    pub total_minutes: i64,
    pub average_minutes: i64,
    pub on_time_count: u32,
    pub late_count: u32,
    pub half_day_count: u32,
    pub short_day_count: u32,
}

impl MonthlySummary {
    /// The documented zero-valued defaults for a month with no records.
    pub fn empty(month: u32, year: i32) -> Self {
        Self {
            month,
            year,
            days_worked: 0,
            total_minutes: 0,
            average_minutes: 0,
            on_time_count: 0,
            late_count: 0,
            half_day_count: 0,
            short_day_count: 0,
        }
    }

    /// Display label for total hours, e.g. `"142h 30m"`, `"0h"` for an empty
    /// month.
    pub fn total_hours_label(&self) -> String {
        worktime::format_minutes(self.total_minutes)
    }

    /// Display label for the average worked day.
    pub fn average_hours_label(&self) -> String {
        worktime::format_minutes(self.average_minutes)
    }
}

/// One member's row in the admin team summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberSummary {
    pub user_id: Uuid,
    pub display_name: String,
    pub days_worked: u32,
    pub total_minutes: i64,
    pub late_count: u32,
}

/// Admin aggregate across the whole team for one (month, year) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub month: u32,
    pub year: i32,
    pub members: Vec<TeamMemberSummary>,
}
