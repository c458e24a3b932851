//! Transport envelope for the attendance REST API.
//!
//! Every backend response is wrapped as `{ success, message?, data? }`.
//! Callers of the client never see this envelope; it is unwrapped at the
//! transport boundary.

use serde::{Deserialize, Serialize};

/// The wire envelope around every attendance API response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// A successful envelope carrying a payload.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// A successful envelope with no payload (e.g. "today" with no record yet).
    pub fn empty() -> Self {
        Self {
            success: true,
            message: None,
            data: None,
        }
    }

    /// A failed envelope carrying a display message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}
