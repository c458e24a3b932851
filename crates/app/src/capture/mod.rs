//! Device capture layer: camera streams and geolocation.
//!
//! The host shell implements [`CameraDevice`] and [`PositionProvider`]
//! against real hardware; everything above those seams is portable and
//! tested with scripted implementations.

pub mod camera;
pub mod location;

use thiserror::Error;

pub use camera::{CameraCapture, CameraDevice, CameraStream, StreamConstraints};
pub use location::{LocationResolver, PositionProvider};

/// Errors from device acquisition and frame handling.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The user refused the camera or location permission prompt.
    #[error("{0}")]
    PermissionDenied(String),

    /// No usable hardware or driver.
    #[error("{0}")]
    DeviceUnavailable(String),

    /// `capture()` was called with no live stream.
    #[error("No active camera stream")]
    NoActiveStream,

    #[error("Image encoding failed: {0}")]
    Encode(String),
}
