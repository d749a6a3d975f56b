//! Gateway configuration, loaded from environment variables.
//!
//! Every component receives its settings at construction; nothing reads the
//! environment at request time.

use std::path::PathBuf;
use std::time::Duration;

/// Shared secret callers must present in the `X-API-Key` header.
///
/// Compared by exact equality; the same value is forwarded to the partner
/// API, which sits in the same trust domain.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a secret value.
    #[must_use]
    pub const fn new(secret: String) -> Self {
        Self(secret)
    }

    /// The secret value, for pass-through as an upstream header.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    /// Check a request-supplied candidate against the secret.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ApiKey").field(&"[REDACTED]").finish()
    }
}

/// Partner API client settings.
#[derive(Debug, Clone)]
pub struct PartnerSettings {
    /// Base URL of the partner position API.
    pub base_url: String,
    /// Request timeout for outbound calls.
    pub timeout: Duration,
    /// How long the refresh flow waits before fetching.
    pub settle_delay: Duration,
}

impl Default for PartnerSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: Duration::from_secs(30),
            settle_delay: Duration::from_secs(2),
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// Directory for archived JSON documents, created at startup if absent.
    pub data_dir: PathBuf,
    /// Path of the relational database file.
    pub db_path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            db_path: PathBuf::from("data/positions.db"),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Port the gateway listens on.
    pub http_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { http_port: 8000 }
    }
}

/// Complete gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Shared webhook secret.
    pub api_key: ApiKey,
    /// Partner API client settings.
    pub partner: PartnerSettings,
    /// Persistence settings.
    pub storage: StorageSettings,
    /// HTTP server settings.
    pub server: ServerSettings,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `GATEWAY_API_KEY` or `PARTNER_BASE_URL`
    /// is missing or empty. All other settings fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = require_env("GATEWAY_API_KEY")?;
        let base_url = require_env("PARTNER_BASE_URL")?;

        let partner = PartnerSettings {
            base_url,
            timeout: parse_env_duration_secs(
                "PARTNER_TIMEOUT_SECS",
                PartnerSettings::default().timeout,
            ),
            settle_delay: parse_env_duration_secs(
                "PARTNER_SETTLE_DELAY_SECS",
                PartnerSettings::default().settle_delay,
            ),
        };

        let storage = StorageSettings {
            data_dir: std::env::var("GATEWAY_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| StorageSettings::default().data_dir),
            db_path: std::env::var("GATEWAY_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| StorageSettings::default().db_path),
        };

        let server = ServerSettings {
            http_port: parse_env_u16("GATEWAY_HTTP_PORT", ServerSettings::default().http_port),
        };

        Ok(Self {
            api_key: ApiKey::new(api_key),
            partner,
            storage,
            server,
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    let value =
        std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))?;
    if value.is_empty() {
        return Err(ConfigError::EmptyValue(key.to_string()));
    }
    Ok(value)
}

fn parse_env_u16(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_duration_secs(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}
