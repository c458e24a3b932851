//! Attendance history view state: records list and monthly summary.

use chrono::NaiveDate;
use tracing::warn;

use domain::models::{AttendanceRecord, MonthlySummary, RecordsQuery};
use shared::loadable::Loadable;

use crate::services::AttendanceClient;

/// State behind the history/summary page for one (month, year) selection.
///
/// Every month/year change is a plain read-through fetch; nothing is cached
/// across navigations.
#[derive(Debug)]
pub struct HistoryState {
    month: u32,
    year: i32,
    summary: Loadable<MonthlySummary>,
    records: Loadable<Vec<AttendanceRecord>>,
}

impl HistoryState {
    pub fn new(month: u32, year: i32) -> Self {
        Self {
            month,
            year,
            summary: Loadable::Idle,
            records: Loadable::Idle,
        }
    }

    pub fn month_year(&self) -> (u32, i32) {
        (self.month, self.year)
    }

    pub fn summary(&self) -> &Loadable<MonthlySummary> {
        &self.summary
    }

    pub fn records(&self) -> &Loadable<Vec<AttendanceRecord>> {
        &self.records
    }

    /// Change the selected month and re-fetch both panels.
    pub async fn set_month(&mut self, client: &AttendanceClient, month: u32, year: i32) {
        self.month = month;
        self.year = year;
        self.load_summary(client).await;
        self.load_records(client).await;
    }

    pub async fn load_summary(&mut self, client: &AttendanceClient) {
        self.summary = Loadable::Loading;
        self.summary = match client.monthly_summary(self.month, self.year).await {
            Ok(summary) => Loadable::Loaded(summary),
            Err(err) => {
                warn!(error = %err, month = self.month, year = self.year,
                      "Monthly summary fetch failed");
                Loadable::Failed(err.to_string())
            }
        };
    }

    pub async fn load_records(&mut self, client: &AttendanceClient) {
        self.records = Loadable::Loading;
        let query = self.month_query();
        self.records = client.my_records(&query).await.into();
    }

    /// Whether the inline retry control should show for the summary panel.
    pub fn can_retry_summary(&self) -> bool {
        self.summary.is_failed()
    }

    /// The retry action offered next to a failed summary fetch.
    pub async fn retry_summary(&mut self, client: &AttendanceClient) {
        self.load_summary(client).await;
    }

    /// Date-range filter covering the selected month.
    fn month_query(&self) -> RecordsQuery {
        let start = NaiveDate::from_ymd_opt(self.year, self.month, 1);
        let end = match self.month {
            12 => NaiveDate::from_ymd_opt(self.year + 1, 1, 1),
            m => NaiveDate::from_ymd_opt(self.year, m + 1, 1),
        }
        .and_then(|first_of_next| first_of_next.pred_opt());
        RecordsQuery {
            start_date: start,
            end_date: end,
            status: None,
            user_id: None,
        }
    }
}
