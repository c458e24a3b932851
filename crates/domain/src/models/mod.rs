//! Domain models.

pub mod attendance;
pub mod capture;
pub mod punch;
pub mod summary;

pub use attendance::{AttendanceRecord, AttendanceStatus, RecordsQuery};
pub use capture::{Frame, Photo, Position, ResolvedLocation};
pub use punch::{PunchKind, PunchPayload};
pub use summary::{MonthlySummary, TeamMemberSummary, TeamSummary};
