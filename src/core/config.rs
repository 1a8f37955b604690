use std::time::Duration;

use crate::auth::JwtConfig;

/// Server configuration - every runtime knob in one immutable struct,
/// constructed once at startup and carried by `ServerState`.
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | DATA_DIR | ./data | Database and log directory |
/// | PORT | 10000 | HTTP port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | LOCALE | vi | User-facing message locale (vi \| en) |
/// | DB_TIMEOUT_MS | 10000 | Per-operation storage deadline |
/// | REQUEST_TIMEOUT_MS | 30000 | Whole-request deadline |
/// | CORS_ORIGINS | localhost dev set | Comma-separated allowed origins |
/// | LOG_DIR | (unset) | Daily-rolling log file directory |
#[derive(Debug, Clone)]
pub struct Config {
    /// Data directory for the embedded database
    pub data_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Locale of user-facing messages
    pub locale: String,
    /// Per-operation storage deadline (milliseconds)
    pub db_timeout_ms: u64,
    /// Whole-request deadline (milliseconds)
    pub request_timeout_ms: u64,
    /// Allowed CORS origins
    pub cors_origins: Vec<String>,
    /// Optional log file directory
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            locale: std::env::var("LOCALE").unwrap_or_else(|_| "vi".into()),
            db_timeout_ms: std::env::var("DB_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| {
                    vec![
                        "http://localhost:3000".into(),
                        "http://localhost:5173".into(),
                        "http://127.0.0.1:3000".into(),
                        "http://127.0.0.1:5173".into(),
                    ]
                }),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Override data dir and port; used by tests
    pub fn with_overrides(data_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.data_dir = data_dir.into();
        config.http_port = http_port;
        config
    }

    /// Per-operation storage deadline
    pub fn db_timeout(&self) -> Duration {
        Duration::from_millis(self.db_timeout_ms)
    }

    /// Whole-request deadline
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
