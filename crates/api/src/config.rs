//! Process configuration.
//!
//! All knobs live in one explicit struct built once in `main` (or by tests)
//! and injected into `build_app`; nothing below the entrypoint reads the
//! environment.

use std::path::PathBuf;

/// Maximum accepted request body, in bytes. Oversized bodies get a 413.
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the listener binds to.
    pub bind_addr: String,
    /// Path of the primary store's JSON document.
    pub data_path: PathBuf,
    /// Redis URL for the secondary mirror; `None` disables mirroring.
    pub secondary_redis_url: Option<String>,
    /// Include primary-store failure detail in 500 bodies (dev only).
    pub expose_error_detail: bool,
    pub body_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            data_path: PathBuf::from("data.json"),
            secondary_redis_url: None,
            expose_error_detail: false,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl AppConfig {
    /// Read configuration from the environment:
    /// `BIND_ADDR`, `DATA_PATH`, `REDIS_URL`, `APP_ENV` (`development`
    /// switches error detail on).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            data_path: std::env::var("DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            secondary_redis_url: std::env::var("REDIS_URL").ok(),
            expose_error_detail: std::env::var("APP_ENV")
                .map(|v| v == "development")
                .unwrap_or(false),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}
