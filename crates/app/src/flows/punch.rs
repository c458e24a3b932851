//! The punch capture-and-submit flow.
//!
//! One `PunchFlow` backs one open capture modal. It owns the camera session,
//! observes location resolution, and guarantees: camera released on every
//! exit path, at most one in-flight submission, and no optimistic mutation
//! of presented state (callers re-fetch after a confirmed round trip).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::{info, warn};

use domain::models::{AttendanceRecord, Photo, PunchKind, PunchPayload, ResolvedLocation};
use shared::loadable::Loadable;

use crate::capture::{CameraCapture, LocationResolver};
use crate::error::AppError;
use crate::services::AttendanceClient;

/// Phase of one punch attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum PunchPhase {
    Idle,
    /// Camera live, location resolving; waiting for the shutter.
    Capturing,
    /// A photo exists; waiting for the user to confirm.
    ReadyToConfirm,
    /// Exactly one network call in flight.
    Submitting,
    Settled(PunchOutcome),
}

/// Terminal result of a punch attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum PunchOutcome {
    /// Server accepted the punch.
    Completed {
        kind: PunchKind,
        record: AttendanceRecord,
    },
    /// Soft conflict ("already punched in" / "not punched in"): the view
    /// was stale, so today's record was re-fetched to reconcile. Presented
    /// as a warning, not a failure.
    Reconciled {
        kind: PunchKind,
        warning: String,
        refreshed: Option<AttendanceRecord>,
    },
    /// Hard failure. Presented state stays untouched.
    Failed { kind: PunchKind, message: String },
}

pub struct PunchFlow {
    camera: CameraCapture,
    resolver: Arc<LocationResolver>,
    client: Arc<AttendanceClient>,
    phase: PunchPhase,
    photo: Option<Photo>,
    notes: Option<String>,
    location: Arc<Mutex<Loadable<ResolvedLocation>>>,
    location_task: Option<JoinHandle<()>>,
    disposed: Arc<AtomicBool>,
}

impl PunchFlow {
    pub fn new(
        camera: CameraCapture,
        resolver: Arc<LocationResolver>,
        client: Arc<AttendanceClient>,
    ) -> Self {
        Self {
            camera,
            resolver,
            client,
            phase: PunchPhase::Idle,
            photo: None,
            notes: None,
            location: Arc::new(Mutex::new(Loadable::Idle)),
            location_task: None,
            disposed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn phase(&self) -> &PunchPhase {
        &self.phase
    }

    /// Snapshot of location resolution. Loading exactly until the single
    /// resolution lands, then stable for the life of the flow.
    pub fn location(&self) -> Loadable<ResolvedLocation> {
        self.location.lock().expect("location lock poisoned").clone()
    }

    pub fn photo(&self) -> Option<&Photo> {
        self.photo.as_ref()
    }

    /// Optional notes passthrough; no capture surface exists for it.
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }

    /// Start the attempt: kick off location resolution and acquire the
    /// camera, concurrently.
    ///
    /// Camera denial leaves the flow in `Idle` and surfaces the blocking
    /// error; the capture flow cannot proceed without a photo.
    pub async fn open(&mut self) -> Result<(), AppError> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(AppError::Internal("Punch flow already closed".into()));
        }
        if self.phase != PunchPhase::Idle {
            return Err(AppError::Internal("Punch flow already open".into()));
        }

        // Location starts first so it resolves while the camera warms up.
        self.spawn_location_task();
        self.camera.open().await?;
        self.phase = PunchPhase::Capturing;
        Ok(())
    }

    fn spawn_location_task(&mut self) {
        *self.location.lock().expect("location lock poisoned") = Loadable::Loading;
        let slot = Arc::clone(&self.location);
        let disposed = Arc::clone(&self.disposed);
        let resolver = Arc::clone(&self.resolver);
        self.location_task = Some(tokio::spawn(async move {
            let resolved = resolver.resolve().await;
            // A late result after close() is simply discarded.
            if !disposed.load(Ordering::SeqCst) {
                *slot.lock().expect("location lock poisoned") = Loadable::Loaded(resolved);
            }
        }));
    }

    /// Take the still. Releases the camera on success and arms the confirm
    /// step.
    pub async fn capture_photo(&mut self) -> Result<(), AppError> {
        if self.phase != PunchPhase::Capturing {
            return Err(AppError::Internal("No capture in progress".into()));
        }
        let photo = self.camera.capture().await?;
        self.photo = Some(photo);
        self.phase = PunchPhase::ReadyToConfirm;
        Ok(())
    }

    /// Discard the photo and reacquire the camera. The old stream is
    /// released strictly before the new one is requested.
    pub async fn retake(&mut self) -> Result<(), AppError> {
        if !matches!(
            self.phase,
            PunchPhase::Capturing | PunchPhase::ReadyToConfirm
        ) {
            return Err(AppError::Internal("Nothing to retake".into()));
        }
        self.photo = None;
        self.camera.retake().await?;
        self.phase = PunchPhase::Capturing;
        Ok(())
    }

    /// Submit the punch. At most one submission per flow instance is ever
    /// in flight: a confirm while not `ReadyToConfirm` (including while
    /// `Submitting`) is ignored and returns the current phase unchanged.
    pub async fn confirm(&mut self, kind: PunchKind) -> PunchPhase {
        if self.phase != PunchPhase::ReadyToConfirm {
            return self.phase.clone();
        }
        let photo = match &self.photo {
            Some(photo) => photo.clone(),
            // ReadyToConfirm implies a photo; treat absence as ignored.
            None => return self.phase.clone(),
        };

        self.phase = PunchPhase::Submitting;

        // Location is best-effort: included only if resolved by now.
        let location = self.location().value().cloned();
        let payload = PunchPayload::from_capture(&photo, location.as_ref(), self.notes.clone());

        let result = match kind {
            PunchKind::In => self.client.punch_in(&payload).await,
            PunchKind::Out => self.client.punch_out(&payload).await,
        };

        let outcome = match result {
            Ok(record) => {
                info!(kind = %kind, "Punch accepted");
                PunchOutcome::Completed { kind, record }
            }
            Err(err) if err.is_conflict() => {
                warn!(kind = %kind, warning = %err, "Punch conflict; reconciling with server state");
                let refreshed = self.client.today().await.ok().flatten();
                PunchOutcome::Reconciled {
                    kind,
                    warning: err.to_string(),
                    refreshed,
                }
            }
            Err(err) => {
                warn!(kind = %kind, error = %err, "Punch failed");
                PunchOutcome::Failed {
                    kind,
                    message: err.to_string(),
                }
            }
        };

        // No-op when capture already released the stream.
        self.camera.close().await;
        self.phase = PunchPhase::Settled(outcome);
        self.phase.clone()
    }

    /// Dispose the flow: release the camera on every exit path, including a
    /// close before capture completed. An in-flight location resolution is
    /// left to finish; its result is discarded.
    pub async fn close(&mut self) {
        self.disposed.store(true, Ordering::SeqCst);
        self.camera.close().await;
        self.photo = None;
        self.location_task.take();
    }

    /// Test/diagnostic view of the camera session.
    pub fn camera(&self) -> &CameraCapture {
        &self.camera
    }
}
