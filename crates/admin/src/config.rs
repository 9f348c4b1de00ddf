//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ADMIN_USERNAME` - Admin login name (default: admin)
//! - `ADMIN_PASSWORD` - Admin password (default: admin123)
//! - `ADMIN_SESSION_TTL_HOURS` - Session lifetime in hours (default: 24)
//! - `WHOLESALE_INVOICE_DIR` - Where rendered invoices are written (default: invoices)

use std::path::PathBuf;

use chrono::Duration;
use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "admin123";
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin configuration.
#[derive(Clone)]
pub struct AdminConfig {
    /// Login name
    pub username: String,
    /// Login password
    pub password: SecretString,
    /// How long a login stays valid
    pub session_ttl: Duration,
    /// Directory for rendered invoices
    pub invoice_dir: PathBuf,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("session_ttl", &self.session_ttl)
            .field("invoice_dir", &self.invoice_dir)
            .finish()
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: SecretString::from(DEFAULT_PASSWORD),
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            invoice_dir: PathBuf::from("invoices"),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `ADMIN_SESSION_TTL_HOURS` is not a positive
    /// number of hours.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let ttl_hours = get_env_or_default(
            "ADMIN_SESSION_TTL_HOURS",
            &DEFAULT_SESSION_TTL_HOURS.to_string(),
        );
        let ttl_hours: i64 = ttl_hours
            .parse()
            .ok()
            .filter(|h| *h > 0)
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "ADMIN_SESSION_TTL_HOURS".to_string(),
                    format!("expected a positive number of hours, got '{ttl_hours}'"),
                )
            })?;

        Ok(Self {
            username: get_env_or_default("ADMIN_USERNAME", DEFAULT_USERNAME),
            password: SecretString::from(get_env_or_default("ADMIN_PASSWORD", DEFAULT_PASSWORD)),
            session_ttl: Duration::hours(ttl_hours),
            invoice_dir: PathBuf::from(get_env_or_default("WHOLESALE_INVOICE_DIR", "invoices")),
        })
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
