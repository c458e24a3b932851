//! User-action flows.

pub mod punch;

pub use punch::{PunchFlow, PunchOutcome, PunchPhase};
