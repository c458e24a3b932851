//! Typed client for the attendance REST API.
//!
//! A thin wrapper that attaches the bearer credential, unwraps the transport
//! envelope, and normalizes every transport failure into one [`AppError`]
//! carrying a display message. Constructed explicitly and injected; there is
//! no ambient HTTP client or storage.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use validator::Validate;

use domain::models::{
    AttendanceRecord, MonthlySummary, PunchPayload, RecordsQuery, TeamSummary,
};
use shared::envelope::ApiEnvelope;
use shared::session::{Navigator, SessionStore};

use crate::config::ApiConfig;
use crate::error::AppError;

/// Backend messages that mean "duplicate punch", reported by deployed
/// backends as 400 rather than 409.
const CONFLICT_PHRASES: [&str; 4] = [
    "already punched in",
    "already checked in",
    "not punched in",
    "no active check-in",
];

/// Client for the attendance service.
pub struct AttendanceClient {
    http: Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl AttendanceClient {
    pub fn new(
        config: &ApiConfig,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            navigator,
        })
    }

    /// Record a punch-in. Returns the created attendance record.
    pub async fn punch_in(&self, payload: &PunchPayload) -> Result<AttendanceRecord, AppError> {
        payload.validate()?;
        let envelope = self
            .request(Method::POST, "/attendance/punch-in", &[], Some(payload))
            .await?;
        envelope
            .data
            .ok_or_else(|| AppError::InvalidResponse("Missing attendance record".into()))
    }

    /// Record a punch-out. Returns the updated attendance record.
    pub async fn punch_out(&self, payload: &PunchPayload) -> Result<AttendanceRecord, AppError> {
        payload.validate()?;
        let envelope = self
            .request(Method::PATCH, "/attendance/punch-out", &[], Some(payload))
            .await?;
        envelope
            .data
            .ok_or_else(|| AppError::InvalidResponse("Missing attendance record".into()))
    }

    /// Today's record, or `None` before the first punch-in of the day.
    pub async fn today(&self) -> Result<Option<AttendanceRecord>, AppError> {
        let envelope: ApiEnvelope<AttendanceRecord> = self
            .request::<AttendanceRecord, ()>(Method::GET, "/attendance/today", &[], None)
            .await?;
        Ok(envelope.data)
    }

    /// Aggregate figures for one month. A month with no records yields the
    /// zero-valued defaults, never an error.
    pub async fn monthly_summary(
        &self,
        month: u32,
        year: i32,
    ) -> Result<MonthlySummary, AppError> {
        shared::validation::validate_month(month)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let query = [
            ("month", month.to_string()),
            ("year", year.to_string()),
        ];
        let envelope: ApiEnvelope<MonthlySummary> = self
            .request::<MonthlySummary, ()>(Method::GET, "/attendance/monthly-summary", &query, None)
            .await?;
        Ok(envelope
            .data
            .unwrap_or_else(|| MonthlySummary::empty(month, year)))
    }

    /// The caller's own records, optionally filtered by date range and
    /// status.
    pub async fn my_records(
        &self,
        query: &RecordsQuery,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        // userId is an admin-only filter; never sent here.
        let mut query = query.clone();
        query.user_id = None;
        let envelope: ApiEnvelope<Vec<AttendanceRecord>> = self
            .request::<Vec<AttendanceRecord>, ()>(
                Method::GET,
                "/attendance/my-records",
                &query.to_query_pairs(),
                None,
            )
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Admin: records across users.
    pub async fn all_records(
        &self,
        query: &RecordsQuery,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let envelope: ApiEnvelope<Vec<AttendanceRecord>> = self
            .request::<Vec<AttendanceRecord>, ()>(
                Method::GET,
                "/attendance/all",
                &query.to_query_pairs(),
                None,
            )
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Admin: per-member aggregates for one month.
    pub async fn team_summary(&self, month: u32, year: i32) -> Result<TeamSummary, AppError> {
        shared::validation::validate_month(month)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let query = [
            ("month", month.to_string()),
            ("year", year.to_string()),
        ];
        let envelope: ApiEnvelope<TeamSummary> = self
            .request::<TeamSummary, ()>(Method::GET, "/attendance/team-summary", &query, None)
            .await?;
        Ok(envelope.data.unwrap_or_else(|| TeamSummary {
            month,
            year,
            members: Vec::new(),
        }))
    }

    /// Issue one request and normalize the outcome.
    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<ApiEnvelope<T>, AppError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "Attendance API request");

        let mut request = self.http.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = self.session.bearer_token() {
            request = request.bearer_auth(token);
        }

        // No response at all (unreachable, refused, timed out).
        let response = request
            .send()
            .await
            .map_err(|_| AppError::NetworkUnreachable("Network error".to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.handle_session_expired();
            return Err(AppError::SessionExpired);
        }

        if !status.is_success() {
            let message = response
                .json::<ApiEnvelope<serde_json::Value>>()
                .await
                .ok()
                .and_then(|envelope| envelope.message);
            return Err(classify_rejection(status, message));
        }

        response
            .json::<ApiEnvelope<T>>()
            .await
            .map_err(|e| AppError::InvalidResponse(e.to_string()))
    }

    /// 401 handling: drop the credential and send the host to the entry
    /// point, unless it is already there (avoids redirect loops).
    fn handle_session_expired(&self) {
        warn!("Credential rejected by attendance service; clearing session");
        self.session.clear();
        if !self.navigator.at_entry() {
            self.navigator.redirect_to_entry();
        }
    }
}

/// Maps a non-2xx response to the normalized taxonomy.
///
/// Message priority: server-provided message, then the generic
/// `"Request failed"` fallback.
fn classify_rejection(status: StatusCode, message: Option<String>) -> AppError {
    let message = message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| "Request failed".to_string());

    let lowered = message.to_lowercase();
    let is_conflict = status == StatusCode::CONFLICT
        || CONFLICT_PHRASES.iter().any(|phrase| lowered.contains(phrase));

    if is_conflict {
        AppError::Conflict(message)
    } else {
        AppError::RequestRejected(message)
    }
}
