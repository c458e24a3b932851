//! Reverse-geocoding service integration.
//!
//! Resolves a coordinate pair to a display address via a Nominatim-style
//! `/reverse` endpoint. Callers treat every error here as recoverable; the
//! location resolver substitutes a coordinate string on failure.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::GeocodingConfig;

/// Errors that can occur during reverse-geocoding.
#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("Reverse-geocoding service URL not configured")]
    NotConfigured,

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response from geocoding service: {0}")]
    InvalidResponse(String),

    #[error("Geocoding service error: {0}")]
    ServiceError(String),
}

/// Nominatim-style reverse response. Error payloads arrive with HTTP 200 and
/// an `error` field.
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the reverse-geocoding service.
pub struct ReverseGeocoder {
    client: Client,
    config: GeocodingConfig,
}

impl ReverseGeocoder {
    pub fn new(config: GeocodingConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(GeocodingError::Http)?;
        Ok(Self { client, config })
    }

    /// Whether a geocoding endpoint is configured at all.
    pub fn is_configured(&self) -> bool {
        !self.config.url.is_empty()
    }

    /// Resolve coordinates to a display address.
    pub async fn reverse(&self, latitude: f64, longitude: f64) -> Result<String, GeocodingError> {
        if !self.is_configured() {
            return Err(GeocodingError::NotConfigured);
        }

        let url = format!("{}/reverse", self.config.url.trim_end_matches('/'));
        debug!(url = %url, latitude, longitude, "Calling reverse-geocoding service");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("format", "jsonv2".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout(self.config.timeout_ms)
                } else {
                    GeocodingError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodingError::ServiceError(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| GeocodingError::InvalidResponse(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(GeocodingError::ServiceError(error));
        }

        body.display_name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| GeocodingError::InvalidResponse("No display name in response".into()))
    }
}
