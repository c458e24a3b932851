use thiserror::Error;

use crate::capture::CaptureError;

/// Normalized error surfaced to the view layer.
///
/// Every failure a view can observe is one of these, carrying a
/// display-ready message. Device and geocoding failures that degrade
/// gracefully never reach this type; camera denial does, because a photo is
/// mandatory.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    DeviceUnavailable(String),

    /// No response was received at all (unreachable host, timeout).
    #[error("{0}")]
    NetworkUnreachable(String),

    /// The server answered non-2xx with a message.
    #[error("{0}")]
    RequestRejected(String),

    /// The backend rejected the credential. The session has already been
    /// cleared and the navigator asked to redirect; not shown to the user.
    #[error("Session expired")]
    SessionExpired,

    /// Already punched in / not punched in. A soft conflict: callers
    /// reconcile by re-fetching rather than failing.
    #[error("{0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid response from attendance service: {0}")]
    InvalidResponse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Conflict(_))
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, AppError::SessionExpired)
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::PermissionDenied(msg) => AppError::PermissionDenied(msg),
            CaptureError::DeviceUnavailable(msg) => AppError::DeviceUnavailable(msg),
            CaptureError::NoActiveStream => {
                AppError::Internal("No active camera stream".to_string())
            }
            CaptureError::Encode(msg) => AppError::Internal(format!("Photo encoding failed: {}", msg)),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
            })
            .collect();
        AppError::Validation(messages.join("; "))
    }
}
