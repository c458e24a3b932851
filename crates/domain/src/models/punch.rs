//! Punch payload model.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::capture::{Photo, ResolvedLocation};

/// Direction of a punch action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PunchKind {
    In,
    Out,
}

impl std::fmt::Display for PunchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PunchKind::In => write!(f, "punch-in"),
            PunchKind::Out => write!(f, "punch-out"),
        }
    }
}

/// Body of a punch-in/punch-out request. Built fresh per attempt, discarded
/// after the submission settles; nothing is persisted client-side.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PunchPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Base64-encoded JPEG. Mandatory for submission; optional on the wire
    /// because the backend owns that rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PunchPayload {
    /// Assembles the payload from capture output.
    ///
    /// The photo is always present by the time this is called; location is
    /// included only if it resolved before the user confirmed.
    pub fn from_capture(
        photo: &Photo,
        location: Option<&ResolvedLocation>,
        notes: Option<String>,
    ) -> Self {
        let (latitude, longitude) = match location.and_then(|l| l.coordinates) {
            Some((lat, lon)) => (Some(lat), Some(lon)),
            None => (None, None),
        };
        Self {
            latitude,
            longitude,
            address: location.map(|l| l.address.clone()),
            photo: Some(photo.to_base64()),
            notes,
        }
    }
}
