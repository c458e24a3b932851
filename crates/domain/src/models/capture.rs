//! Capture value types: device positions, raw frames, encoded photos.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// One-shot device position fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy in meters, when the provider reports one.
    pub accuracy: Option<f64>,
}

/// Outcome of location resolution. Never an error: the address degrades to a
/// coordinate string or a fixed placeholder instead.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// `(latitude, longitude)`; `None` when the device denied or lacks a fix.
    pub coordinates: Option<(f64, f64)>,
    pub address: String,
}

impl ResolvedLocation {
    /// Placeholder address when no position could be acquired.
    pub const UNAVAILABLE: &'static str = "Location unavailable";

    pub fn unavailable() -> Self {
        Self {
            coordinates: None,
            address: Self::UNAVAILABLE.to_string(),
        }
    }

    /// The coordinate-string fallback used when reverse geocoding fails.
    pub fn coordinate_label(latitude: f64, longitude: f64) -> String {
        format!("{:.6}, {:.6}", latitude, longitude)
    }
}

/// A raw still frame in packed RGB8, as read from a camera stream at its
/// native resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// `width * height * 3` bytes, row-major.
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 3) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Returns the RGB triple at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y * self.width + x) * 3) as usize;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// Flips the frame around its vertical axis in place.
    ///
    /// The live selfie preview is mirrored for a natural experience; the
    /// stored photo must read correctly, so the captured frame is flipped
    /// back: stored column `x` holds preview column `width - 1 - x`.
    pub fn mirror_horizontal(&mut self) {
        let row_bytes = (self.width * 3) as usize;
        for row in self.pixels.chunks_exact_mut(row_bytes) {
            let mut left = 0usize;
            let mut right = self.width as usize - 1;
            while left < right {
                for channel in 0..3 {
                    row.swap(left * 3 + channel, right * 3 + channel);
                }
                left += 1;
                right -= 1;
            }
        }
    }
}

/// An encoded still image ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Photo {
    /// Base64 form carried in the punch payload.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.jpeg)
    }
}
