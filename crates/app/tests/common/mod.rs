//! Common test utilities for integration tests.
//!
//! Provides a stub attendance backend (axum, ephemeral port, in-memory
//! state) that the real reqwest client talks to, plus scripted camera and
//! position devices for driving the punch flow end to end.

// Allow dead code in this module - these are helper utilities that may not be
// used by every integration test but are intentionally available to all.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use attendance_app::capture::{
    CameraCapture, CameraDevice, CameraStream, CaptureError, LocationResolver, PositionProvider,
    StreamConstraints,
};
use attendance_app::config::{ApiConfig, CameraConfig, GeocodingConfig};
use attendance_app::flows::PunchFlow;
use attendance_app::services::{AttendanceClient, ReverseGeocoder};
use domain::models::{
    AttendanceRecord, AttendanceStatus, Frame, MonthlySummary, Position,
};
use shared::envelope::ApiEnvelope;
use shared::session::{MemorySession, Navigator, SessionStore};

/// Address returned by the stub reverse-geocoding endpoint.
pub const STUB_ADDRESS: &str = "1 Office Park, Springfield";

// ============================================================================
// Stub backend
// ============================================================================

/// In-memory state behind the stub attendance backend.
#[derive(Default)]
pub struct StubState {
    /// When set, every attendance route requires this bearer token.
    pub require_token: Option<String>,
    pub user_id: Uuid,
    pub today: Option<AttendanceRecord>,
    pub records: Vec<AttendanceRecord>,
    pub summaries: HashMap<(u32, i32), MonthlySummary>,
    /// Body of the most recent punch request, as received on the wire.
    pub last_punch_body: Option<serde_json::Value>,
    /// One-shot failure injected into the next attendance request.
    pub fail_next: Option<(u16, String)>,
    /// Makes /attendance/today hang past any client timeout.
    pub hang_today: bool,
    /// Count of attendance requests that reached the backend.
    pub attendance_requests: usize,
}

pub type SharedStub = Arc<Mutex<StubState>>;

pub fn new_stub() -> SharedStub {
    Arc::new(Mutex::new(StubState::default()))
}

fn authorized(state: &StubState, headers: &HeaderMap) -> bool {
    match &state.require_token {
        None => true,
        Some(token) => headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == format!("Bearer {}", token))
            .unwrap_or(false),
    }
}

fn take_injected_failure(
    state: &mut StubState,
) -> Option<(StatusCode, Json<ApiEnvelope<AttendanceRecord>>)> {
    state.fail_next.take().map(|(code, message)| {
        (
            StatusCode::from_u16(code).expect("valid status code"),
            Json(ApiEnvelope::error(message)),
        )
    })
}

async fn punch_in(
    State(stub): State<SharedStub>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<ApiEnvelope<AttendanceRecord>>) {
    let mut state = stub.lock().unwrap();
    state.attendance_requests += 1;
    if !authorized(&state, &headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiEnvelope::error("Session expired")),
        );
    }
    if let Some(failure) = take_injected_failure(&mut state) {
        return failure;
    }
    state.last_punch_body = Some(body);

    if state
        .today
        .as_ref()
        .map_or(false, |r| r.login_time.is_some())
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiEnvelope::error("Already punched in today")),
        );
    }

    let record = AttendanceRecord {
        id: Uuid::new_v4(),
        user_id: state.user_id,
        date: Utc::now().date_naive(),
        login_time: Some(Utc::now()),
        logout_time: None,
        attendance_status: AttendanceStatus::OnTime,
    };
    state.today = Some(record.clone());
    (StatusCode::OK, Json(ApiEnvelope::ok(record)))
}

async fn punch_out(
    State(stub): State<SharedStub>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<ApiEnvelope<AttendanceRecord>>) {
    let mut state = stub.lock().unwrap();
    state.attendance_requests += 1;
    if !authorized(&state, &headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiEnvelope::error("Session expired")),
        );
    }
    if let Some(failure) = take_injected_failure(&mut state) {
        return failure;
    }
    state.last_punch_body = Some(body);

    let open_record = state
        .today
        .as_mut()
        .filter(|r| r.login_time.is_some() && r.logout_time.is_none());
    match open_record {
        Some(record) => {
            record.logout_time = Some(Utc::now());
            let record = record.clone();
            (StatusCode::OK, Json(ApiEnvelope::ok(record)))
        }
        None => (
            StatusCode::BAD_REQUEST,
            Json(ApiEnvelope::error("Not punched in today")),
        ),
    }
}

async fn today(
    State(stub): State<SharedStub>,
    headers: HeaderMap,
) -> (StatusCode, Json<ApiEnvelope<AttendanceRecord>>) {
    let (hang, ok, data, failure) = {
        let mut state = stub.lock().unwrap();
        state.attendance_requests += 1;
        let failure = take_injected_failure(&mut state);
        (
            state.hang_today,
            authorized(&state, &headers),
            state.today.clone(),
            failure,
        )
    };
    if hang {
        tokio::time::sleep(Duration::from_secs(10)).await;
    }
    if !ok {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiEnvelope::error("Session expired")),
        );
    }
    if let Some(failure) = failure {
        return failure;
    }
    (
        StatusCode::OK,
        Json(ApiEnvelope {
            success: true,
            message: None,
            data,
        }),
    )
}

#[derive(Debug, Deserialize)]
struct SummaryQuery {
    month: u32,
    year: i32,
}

async fn monthly_summary(
    State(stub): State<SharedStub>,
    headers: HeaderMap,
    Query(query): Query<SummaryQuery>,
) -> (StatusCode, Json<ApiEnvelope<MonthlySummary>>) {
    let mut state = stub.lock().unwrap();
    state.attendance_requests += 1;
    if !authorized(&state, &headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiEnvelope::error("Session expired")),
        );
    }
    if let Some((code, message)) = state.fail_next.take() {
        return (
            StatusCode::from_u16(code).expect("valid status code"),
            Json(ApiEnvelope::error(message)),
        );
    }
    match state.summaries.get(&(query.month, query.year)) {
        Some(summary) => (StatusCode::OK, Json(ApiEnvelope::ok(summary.clone()))),
        // No records for that month: the backend sends an empty payload.
        None => (StatusCode::OK, Json(ApiEnvelope::empty())),
    }
}

async fn records(
    State(stub): State<SharedStub>,
    headers: HeaderMap,
) -> (StatusCode, Json<ApiEnvelope<Vec<AttendanceRecord>>>) {
    let mut state = stub.lock().unwrap();
    state.attendance_requests += 1;
    if !authorized(&state, &headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiEnvelope::error("Session expired")),
        );
    }
    (
        StatusCode::OK,
        Json(ApiEnvelope::ok(state.records.clone())),
    )
}

async fn team_summary(
    State(stub): State<SharedStub>,
    headers: HeaderMap,
) -> (StatusCode, Json<ApiEnvelope<serde_json::Value>>) {
    let mut state = stub.lock().unwrap();
    state.attendance_requests += 1;
    if !authorized(&state, &headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiEnvelope::error("Session expired")),
        );
    }
    (StatusCode::OK, Json(ApiEnvelope::empty()))
}

async fn reverse_geocode() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "display_name": STUB_ADDRESS }))
}

/// Bind the stub backend to an ephemeral port and serve it in the
/// background. Returns its base URL.
pub async fn spawn_backend(stub: SharedStub) -> String {
    let app = Router::new()
        .route("/attendance/punch-in", post(punch_in))
        .route("/attendance/punch-out", patch(punch_out))
        .route("/attendance/today", get(today))
        .route("/attendance/monthly-summary", get(monthly_summary))
        .route("/attendance/my-records", get(records))
        .route("/attendance/all", get(records))
        .route("/attendance/team-summary", get(team_summary))
        .route("/reverse", get(reverse_geocode))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub backend");
    let addr = listener.local_addr().expect("stub backend addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub backend");
    });
    format!("http://{}", addr)
}

// ============================================================================
// Client + session fixtures
// ============================================================================

/// Navigator that records redirect requests instead of navigating.
#[derive(Default)]
pub struct RecordingNavigator {
    pub entry: AtomicBool,
    pub redirects: AtomicUsize,
}

impl Navigator for RecordingNavigator {
    fn at_entry(&self) -> bool {
        self.entry.load(Ordering::SeqCst)
    }

    fn redirect_to_entry(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

/// Build a real client against `base_url` with an in-memory session.
pub fn make_client(
    base_url: &str,
    token: Option<&str>,
) -> (
    Arc<AttendanceClient>,
    Arc<MemorySession>,
    Arc<RecordingNavigator>,
) {
    let session = Arc::new(match token {
        Some(token) => MemorySession::with_token(token),
        None => MemorySession::new(),
    });
    let navigator = Arc::new(RecordingNavigator::default());
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 2,
    };
    let client = AttendanceClient::new(
        &config,
        session.clone() as Arc<dyn SessionStore>,
        navigator.clone() as Arc<dyn Navigator>,
    )
    .expect("client construction");
    (Arc::new(client), session, navigator)
}

// ============================================================================
// Scripted devices
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraScript {
    Grant,
    Deny,
    Unavailable,
}

/// Camera device that follows a fixed script and counts acquisitions.
pub struct ScriptedCamera {
    script: CameraScript,
    width: u32,
    height: u32,
    pub opens: Arc<AtomicUsize>,
    pub releases: Arc<AtomicUsize>,
}

impl ScriptedCamera {
    pub fn granting() -> Self {
        Self::with_script(CameraScript::Grant)
    }

    pub fn denying() -> Self {
        Self::with_script(CameraScript::Deny)
    }

    pub fn with_script(script: CameraScript) -> Self {
        Self {
            script,
            width: 8,
            height: 6,
            opens: Arc::new(AtomicUsize::new(0)),
            releases: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn counters(&self) -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        (self.opens.clone(), self.releases.clone())
    }
}

#[async_trait::async_trait]
impl CameraDevice for ScriptedCamera {
    async fn open(
        &self,
        _constraints: &StreamConstraints,
    ) -> Result<Box<dyn CameraStream>, CaptureError> {
        match self.script {
            CameraScript::Deny => Err(CaptureError::PermissionDenied(
                "Camera permission denied".to_string(),
            )),
            CameraScript::Unavailable => Err(CaptureError::DeviceUnavailable(
                "No camera present".to_string(),
            )),
            CameraScript::Grant => {
                self.opens.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(ScriptedStream {
                    width: self.width,
                    height: self.height,
                    releases: self.releases.clone(),
                    released: false,
                }))
            }
        }
    }
}

struct ScriptedStream {
    width: u32,
    height: u32,
    releases: Arc<AtomicUsize>,
    released: bool,
}

#[async_trait::async_trait]
impl CameraStream for ScriptedStream {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    async fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let pixels = (0..self.width * self.height * 3)
            .map(|i| (i % 251) as u8)
            .collect();
        Ok(Frame::new(self.width, self.height, pixels))
    }

    async fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Position provider with a fixed answer; `None` behaves as denied.
pub struct ScriptedProvider {
    pub position: Option<Position>,
}

impl ScriptedProvider {
    pub fn fixed() -> Self {
        Self {
            position: Some(Position {
                latitude: 23.8103,
                longitude: 90.4125,
                accuracy: Some(12.0),
            }),
        }
    }

    pub fn denied() -> Self {
        Self { position: None }
    }
}

#[async_trait::async_trait]
impl PositionProvider for ScriptedProvider {
    async fn current_position(&self) -> Result<Position, CaptureError> {
        self.position.ok_or_else(|| {
            CaptureError::PermissionDenied("Location permission denied".to_string())
        })
    }
}

// ============================================================================
// Flow fixtures
// ============================================================================

/// Assemble a punch flow from scripted devices and a real client.
pub fn make_flow(
    camera: ScriptedCamera,
    provider: ScriptedProvider,
    client: Arc<AttendanceClient>,
    geocoder_url: &str,
) -> PunchFlow {
    let camera_config = CameraConfig {
        ideal_width: 8,
        ideal_height: 6,
        jpeg_quality: 90,
        front_facing: true,
    };
    let capture = CameraCapture::new(Arc::new(camera), &camera_config);
    let geocoder = ReverseGeocoder::new(GeocodingConfig {
        url: geocoder_url.to_string(),
        timeout_ms: 1000,
    })
    .expect("geocoder construction");
    let resolver = Arc::new(LocationResolver::new(
        Arc::new(provider),
        Arc::new(geocoder),
    ));
    PunchFlow::new(capture, resolver, client)
}

/// Wait until the flow's location resolution settles.
pub async fn wait_for_location(flow: &PunchFlow) {
    for _ in 0..200 {
        if flow.location().is_settled() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("location resolution never settled");
}
