use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub api: ApiConfig,

    #[serde(default)]
    pub geocoding: GeocodingConfig,

    #[serde(default)]
    #[validate(nested)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Attendance backend connection settings.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApiConfig {
    /// Base URL of the attendance service, e.g. `https://hr.example.com/api`.
    #[validate(length(min = 1, message = "api.base_url must be set"))]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_api_timeout_secs")]
    pub timeout_secs: u64,
}

/// Reverse-geocoding service settings.
///
/// An empty URL disables geocoding entirely; location resolution then falls
/// back to the coordinate string.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingConfig {
    #[serde(default)]
    pub url: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_geocoding_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CameraConfig {
    /// Requested stream width; the device grants what it can.
    #[serde(default = "default_camera_width")]
    pub ideal_width: u32,

    #[serde(default = "default_camera_height")]
    pub ideal_height: u32,

    /// JPEG quality for the stored photo, 1-100.
    #[serde(default = "default_jpeg_quality")]
    #[validate(custom(function = "shared::validation::validate_jpeg_quality"))]
    pub jpeg_quality: u8,

    /// Prefer the user-facing camera.
    #[serde(default = "default_front_facing")]
    pub front_facing: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_api_timeout_secs() -> u64 {
    15
}
fn default_geocoding_timeout_ms() -> u64 {
    5000
}
fn default_camera_width() -> u32 {
    1280
}
fn default_camera_height() -> u32 {
    720
}
fn default_jpeg_quality() -> u8 {
    90
}
fn default_front_facing() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_ms: default_geocoding_timeout_ms(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            ideal_width: default_camera_width(),
            ideal_height: default_camera_height(),
            jpeg_quality: default_jpeg_quality(),
            front_facing: default_front_facing(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with ATTEND__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("ATTEND").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds the config entirely from embedded defaults and overrides,
    /// without touching the file system.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [api]
            base_url = "http://127.0.0.1:8080"
            timeout_secs = 15

            [geocoding]
            url = ""
            timeout_ms = 5000

            [camera]
            ideal_width = 1280
            ideal_height = 720
            jpeg_quality = 90
            front_facing = true

            [logging]
            level = "info"
            format = "json"
        "#;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            defaults,
            config::FileFormat::Toml,
        ));
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }
}
