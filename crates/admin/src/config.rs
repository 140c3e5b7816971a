//! Console configuration loaded from environment variables.
//!
//! Every variable is optional; an invalid value is an error rather than a
//! silent fallback.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `PTT_ADMIN_API_BASE_URL` - Base URL of the REST API (default: `http://localhost:8000`)
//! - `PTT_ADMIN_SESSION_FILE` - Where the session cookie jar is kept
//!   (default: `$HOME/.ptt-admin/session.json`)
//! - `PTT_ADMIN_REQUEST_TIMEOUT_SECS` - Per-request timeout; unset means requests never time out
//! - `PTT_ADMIN_LOG_FORMAT` - `text` (default) or `json`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default API base URL for a local backend.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

const SESSION_DIR: &str = ".ptt-admin";
const SESSION_FILE_NAME: &str = "session.json";
const FALLBACK_SESSION_FILE: &str = ".ptt-admin-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected text or json, got {other}")),
        }
    }
}

/// Console configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL of the REST API; endpoint paths are appended to it.
    pub api_base_url: Url,
    /// Location of the persisted session cookie jar.
    pub session_file: PathBuf,
    /// Optional per-request timeout.
    pub request_timeout: Option<Duration>,
    /// Log output format.
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
}

impl ConsoleConfig {
    /// Build a configuration for the given API base URL with every other
    /// setting at its default.
    #[must_use]
    pub fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            session_file: PathBuf::from(FALLBACK_SESSION_FILE),
            request_timeout: None,
            log_format: LogFormat::Text,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_base_url = lookup("PTT_ADMIN_API_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = parse_base_url(&raw_base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("PTT_ADMIN_API_BASE_URL".to_string(), e))?;

        let session_file = lookup("PTT_ADMIN_SESSION_FILE").map_or_else(
            || default_session_file(lookup("HOME")),
            PathBuf::from,
        );

        let request_timeout = lookup("PTT_ADMIN_REQUEST_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| {
                        ConfigError::InvalidEnvVar(
                            "PTT_ADMIN_REQUEST_TIMEOUT_SECS".to_string(),
                            e.to_string(),
                        )
                    })
            })
            .transpose()?;

        let log_format = lookup("PTT_ADMIN_LOG_FORMAT")
            .map(|raw| {
                raw.parse::<LogFormat>().map_err(|e| {
                    ConfigError::InvalidEnvVar("PTT_ADMIN_LOG_FORMAT".to_string(), e)
                })
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            api_base_url,
            session_file,
            request_timeout,
            log_format,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse and validate the API base URL.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme {other}, expected http or https")),
    }
    if url.host_str().is_none() {
        return Err("URL has no host".to_string());
    }
    Ok(url)
}

/// Default session file under the home directory, or the working directory
/// when no home is known.
fn default_session_file(home: Option<String>) -> PathBuf {
    home.filter(|h| !h.is_empty()).map_or_else(
        || PathBuf::from(FALLBACK_SESSION_FILE),
        |h| PathBuf::from(h).join(SESSION_DIR).join(SESSION_FILE_NAME),
    )
}
