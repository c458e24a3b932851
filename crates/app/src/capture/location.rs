//! One-shot location resolution with graceful degradation.

use std::sync::Arc;

use domain::models::{Position, ResolvedLocation};
use tracing::{debug, warn};

use super::CaptureError;
use crate::services::geocoding::ReverseGeocoder;

/// Host-implemented geolocation seam. One-shot fix, not a continuous watch.
#[async_trait::async_trait]
pub trait PositionProvider: Send + Sync {
    async fn current_position(&self) -> Result<Position, CaptureError>;
}

/// Resolves device coordinates to a display address.
///
/// `resolve` never fails: a punch may proceed without location, so every
/// failure path degrades to a usable address string instead of propagating.
pub struct LocationResolver {
    provider: Arc<dyn PositionProvider>,
    geocoder: Arc<ReverseGeocoder>,
}

impl LocationResolver {
    pub fn new(provider: Arc<dyn PositionProvider>, geocoder: Arc<ReverseGeocoder>) -> Self {
        Self { provider, geocoder }
    }

    /// Acquire a position fix and reverse-geocode it.
    ///
    /// - Device denial or absence: coordinates `None`, address
    ///   `"Location unavailable"`.
    /// - Geocoding failure or timeout: the coordinate string stands in for
    ///   the address.
    pub async fn resolve(&self) -> ResolvedLocation {
        let position = match self.provider.current_position().await {
            Ok(position) => position,
            Err(err) => {
                warn!(error = %err, "Device position unavailable");
                return ResolvedLocation::unavailable();
            }
        };

        let address = match self
            .geocoder
            .reverse(position.latitude, position.longitude)
            .await
        {
            Ok(address) => address,
            Err(err) => {
                debug!(error = %err, "Reverse geocoding failed, using coordinate fallback");
                ResolvedLocation::coordinate_label(position.latitude, position.longitude)
            }
        };

        ResolvedLocation {
            coordinates: Some((position.latitude, position.longitude)),
            address,
        }
    }
}
