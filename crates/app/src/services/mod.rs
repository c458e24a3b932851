//! Remote service clients.

pub mod attendance;
pub mod geocoding;

pub use attendance::AttendanceClient;
pub use geocoding::ReverseGeocoder;
