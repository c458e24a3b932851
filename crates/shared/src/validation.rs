//! Common validation utilities.

use validator::ValidationError;

/// Validates that a latitude value is within valid range (-90 to 90).
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        let mut err = ValidationError::new("latitude_range");
        err.message = Some("Latitude must be between -90 and 90".into());
        Err(err)
    }
}

/// Validates that a longitude value is within valid range (-180 to 180).
pub fn validate_longitude(lon: f64) -> Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        let mut err = ValidationError::new("longitude_range");
        err.message = Some("Longitude must be between -180 and 180".into());
        Err(err)
    }
}

/// Validates that a calendar month is within 1 to 12.
pub fn validate_month(month: u32) -> Result<(), ValidationError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        let mut err = ValidationError::new("month_range");
        err.message = Some("Month must be between 1 and 12".into());
        Err(err)
    }
}

/// Validates a JPEG quality setting (1 to 100).
pub fn validate_jpeg_quality(quality: u8) -> Result<(), ValidationError> {
    if (1..=100).contains(&quality) {
        Ok(())
    } else {
        let mut err = ValidationError::new("jpeg_quality_range");
        err.message = Some("JPEG quality must be between 1 and 100".into());
        Err(err)
    }
}
