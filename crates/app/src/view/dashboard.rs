//! Dashboard view state: today's record and its derived display values.

use chrono::{DateTime, Utc};
use tracing::warn;

use domain::models::AttendanceRecord;
use domain::services::worktime;
use shared::loadable::Loadable;

use crate::services::AttendanceClient;

/// Derived punch status for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunchStatus {
    NotCheckedIn,
    CheckedIn,
    CheckedOut,
}

impl PunchStatus {
    pub fn label(self) -> &'static str {
        match self {
            PunchStatus::NotCheckedIn => "Not Checked In",
            PunchStatus::CheckedIn => "Checked In",
            PunchStatus::CheckedOut => "Checked Out",
        }
    }
}

/// State behind the dashboard's attendance card.
#[derive(Debug, Default)]
pub struct DashboardState {
    today: Loadable<Option<AttendanceRecord>>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn today(&self) -> &Loadable<Option<AttendanceRecord>> {
        &self.today
    }

    /// Re-fetch today's record.
    ///
    /// Presented state only ever reflects a confirmed server round trip: a
    /// failed refresh keeps the last loaded value instead of replacing it
    /// with an error, so a transient outage never flips the card.
    pub async fn refresh(&mut self, client: &AttendanceClient) {
        if !self.today.is_loaded() {
            self.today = Loadable::Loading;
        }
        match client.today().await {
            Ok(record) => self.today = Loadable::Loaded(record),
            Err(err) => {
                warn!(error = %err, "Failed to refresh today's record");
                if !self.today.is_loaded() {
                    self.today = Loadable::Failed(err.to_string());
                }
            }
        }
    }

    /// Adopt a record delivered out-of-band (e.g. conflict reconciliation).
    pub fn absorb(&mut self, record: Option<AttendanceRecord>) {
        self.today = Loadable::Loaded(record);
    }

    fn record(&self) -> Option<&AttendanceRecord> {
        self.today.value().and_then(|r| r.as_ref())
    }

    /// Derived status; `None` until the first fetch settles successfully.
    pub fn punch_status(&self) -> Option<PunchStatus> {
        match self.today.value()? {
            None => Some(PunchStatus::NotCheckedIn),
            Some(record) if record.is_checked_out() => Some(PunchStatus::CheckedOut),
            Some(record) if record.is_checked_in() => Some(PunchStatus::CheckedIn),
            Some(_) => Some(PunchStatus::NotCheckedIn),
        }
    }

    /// Worked-time label as of `now`: running while checked in, final once
    /// checked out. `None` before the first punch-in.
    pub fn worked_label(&self, now: DateTime<Utc>) -> Option<String> {
        worktime::worked_label(self.record()?, now)
    }

    pub fn can_punch_in(&self) -> bool {
        self.punch_status() == Some(PunchStatus::NotCheckedIn)
    }

    pub fn can_punch_out(&self) -> bool {
        self.punch_status() == Some(PunchStatus::CheckedIn)
    }
}
