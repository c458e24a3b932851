//! View-state containers.
//!
//! These hold everything a frontend needs to render, derived exclusively
//! from server-confirmed data. Loading/data/error triples are single
//! [`shared::loadable::Loadable`] values, never independent flags.

pub mod dashboard;
pub mod history;

pub use dashboard::{DashboardState, PunchStatus};
pub use history::HistoryState;

use domain::models::PunchKind;

use crate::services::AttendanceClient;

/// Post-punch refresh policy: a settled punch re-fetches today's record,
/// and a punch-out additionally re-fetches the monthly summary.
pub async fn refresh_after_punch(
    kind: PunchKind,
    dashboard: &mut DashboardState,
    history: &mut HistoryState,
    client: &AttendanceClient,
) {
    dashboard.refresh(client).await;
    if kind == PunchKind::Out {
        history.load_summary(client).await;
    }
}
