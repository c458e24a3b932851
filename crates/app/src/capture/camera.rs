//! Camera stream acquisition and still capture.
//!
//! The camera stream is exclusively owned by one [`CameraCapture`] at a
//! time. Reacquisition ("retake") always releases the old stream strictly
//! before a new one is requested, so at most one stream is ever live.

use std::sync::Arc;

use domain::models::{Frame, Photo};
use image::codecs::jpeg::JpegEncoder;
use tracing::debug;

use super::CaptureError;
use crate::config::CameraConfig;

/// Requested stream parameters. The device grants what it can.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub front_facing: bool,
}

impl From<&CameraConfig> for StreamConstraints {
    fn from(config: &CameraConfig) -> Self {
        Self {
            ideal_width: config.ideal_width,
            ideal_height: config.ideal_height,
            front_facing: config.front_facing,
        }
    }
}

/// Host-implemented camera hardware seam.
#[async_trait::async_trait]
pub trait CameraDevice: Send + Sync {
    /// Acquire a live stream, or fail with `PermissionDenied` /
    /// `DeviceUnavailable`.
    async fn open(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn CameraStream>, CaptureError>;
}

/// A live camera stream handle.
#[async_trait::async_trait]
pub trait CameraStream: Send + Sync {
    /// Granted stream dimensions (may differ from the requested ideal).
    fn dimensions(&self) -> (u32, u32);

    /// Read the current frame at native resolution.
    async fn read_frame(&mut self) -> Result<Frame, CaptureError>;

    /// Release the underlying hardware. Must be safe to call repeatedly.
    async fn release(&mut self);
}

/// Exclusive owner of at most one live camera stream.
pub struct CameraCapture {
    device: Arc<dyn CameraDevice>,
    constraints: StreamConstraints,
    jpeg_quality: u8,
    stream: Option<Box<dyn CameraStream>>,
    acquired: u64,
    released: u64,
}

impl CameraCapture {
    pub fn new(device: Arc<dyn CameraDevice>, config: &CameraConfig) -> Self {
        Self {
            device,
            constraints: StreamConstraints::from(config),
            jpeg_quality: config.jpeg_quality,
            stream: None,
            acquired: 0,
            released: 0,
        }
    }

    /// Acquire the camera stream.
    ///
    /// Any prior stream is released first, so reacquisition can never leak a
    /// second live stream.
    pub async fn open(&mut self) -> Result<(), CaptureError> {
        self.close().await;
        let stream = self.device.open(&self.constraints).await?;
        self.acquired += 1;
        let (width, height) = stream.dimensions();
        debug!(width, height, "Camera stream acquired");
        self.stream = Some(stream);
        Ok(())
    }

    /// Release the stream. Idempotent; safe when nothing is open.
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.release().await;
            self.released += 1;
            debug!("Camera stream released");
        }
    }

    /// Discard the current photo attempt and reacquire the stream.
    pub async fn retake(&mut self) -> Result<(), CaptureError> {
        self.open().await
    }

    /// Capture one still: read the current frame, un-mirror it, encode JPEG,
    /// and release the camera.
    ///
    /// Fails with `NoActiveStream` when nothing is open.
    pub async fn capture(&mut self) -> Result<Photo, CaptureError> {
        let stream = self.stream.as_mut().ok_or(CaptureError::NoActiveStream)?;
        let mut frame = stream.read_frame().await?;
        frame.mirror_horizontal();
        let photo = encode_jpeg(&frame, self.jpeg_quality)?;
        self.close().await;
        debug!(
            width = photo.width,
            height = photo.height,
            bytes = photo.jpeg.len(),
            "Photo captured"
        );
        Ok(photo)
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Streams currently live: acquisitions minus releases. The single-owner
    /// invariant keeps this at 0 or 1.
    pub fn live_streams(&self) -> u64 {
        self.acquired - self.released
    }
}

/// Encode a raw RGB frame as JPEG at the configured quality.
fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Photo, CaptureError> {
    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality);
    encoder
        .encode(
            &frame.pixels,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| CaptureError::Encode(e.to_string()))?;
    Ok(Photo {
        jpeg,
        width: frame.width,
        height: frame.height,
    })
}
