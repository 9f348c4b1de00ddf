//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `WHOLESALE_DATABASE_URL` - `PostgreSQL` connection string, only when
//!   `WHOLESALE_BACKEND=postgres` (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `WHOLESALE_BACKEND` - `local` (default), `memory` or `postgres`
//! - `WHOLESALE_DATA_DIR` - Directory for the local backend (default: data)
//! - `WHOLESALE_COUNTRY_CODE` - Dialing code for WhatsApp numbers (default: 92)
//! - `WHOLESALE_TRUNK_PREFIX` - Domestic trunk prefix (default: 0)
//! - `WHOLESALE_WHATSAPP_DOMAIN` - Click-to-chat domain (default: wa.me)
//! - `WHOLESALE_SEED_CATALOG` - Seed sample products into an empty catalog (default: true)
//! - `WHOLESALE_CUSTOMER_SYNC_RETRIES` - Attempts for the customer update after an order (default: 3)
//! - `WHOLESALE_CUSTOMER_SYNC_BACKOFF_MS` - Delay between attempts (default: 50)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use wholesale_core::DialingPlan;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which persistence backend the stores use.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// Process-local map; nothing survives a restart.
    Memory,
    /// One JSON file per record in a directory.
    Local { data_dir: PathBuf },
    /// Shared `PostgreSQL` document table.
    Postgres { database_url: SecretString },
}

/// Retry policy for the customer step of order creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Delay before each retry, multiplied by the attempt number.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(50),
        }
    }
}

/// WhatsApp click-to-chat settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsAppConfig {
    /// Link domain (e.g. `wa.me`).
    pub domain: String,
    /// Rules for turning customer phones into international numbers.
    pub dialing: DialingPlan,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            domain: "wa.me".to_owned(),
            dialing: DialingPlan::default(),
        }
    }
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Persistence backend
    pub backend: BackendConfig,
    /// WhatsApp link settings
    pub whatsapp: WhatsAppConfig,
    /// Seed the sample catalog when no products exist
    pub seed_catalog: bool,
    /// Customer update retry policy
    pub customer_sync: RetryPolicy,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::Memory,
            whatsapp: WhatsAppConfig::default(),
            seed_catalog: true,
            customer_sync: RetryPolicy::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let backend = match get_env_or_default("WHOLESALE_BACKEND", "local").as_str() {
            "memory" => BackendConfig::Memory,
            "local" => BackendConfig::Local {
                data_dir: PathBuf::from(get_env_or_default("WHOLESALE_DATA_DIR", "data")),
            },
            "postgres" => BackendConfig::Postgres {
                database_url: get_database_url("WHOLESALE_DATABASE_URL")?,
            },
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "WHOLESALE_BACKEND".to_string(),
                    format!("unknown backend '{other}' (expected local, memory or postgres)"),
                ));
            }
        };

        let trunk_prefix = get_env_or_default("WHOLESALE_TRUNK_PREFIX", "0");
        let trunk_prefix = single_char(&trunk_prefix).ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "WHOLESALE_TRUNK_PREFIX".to_string(),
                "must be a single character".to_string(),
            )
        })?;

        let whatsapp = WhatsAppConfig {
            domain: get_env_or_default("WHOLESALE_WHATSAPP_DOMAIN", "wa.me"),
            dialing: DialingPlan::new(
                get_env_or_default("WHOLESALE_COUNTRY_CODE", "92"),
                trunk_prefix,
            ),
        };

        let customer_sync = RetryPolicy {
            attempts: parse_env("WHOLESALE_CUSTOMER_SYNC_RETRIES", "3")?,
            backoff: Duration::from_millis(parse_env("WHOLESALE_CUSTOMER_SYNC_BACKOFF_MS", "50")?),
        };

        Ok(Self {
            backend,
            whatsapp,
            seed_catalog: parse_env("WHOLESALE_SEED_CATALOG", "true")?,
            customer_sync,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_char() {
        assert_eq!(single_char("0"), Some('0'));
        assert_eq!(single_char(""), None);
        assert_eq!(single_char("00"), None);
    }

    #[test]
    fn test_parse_env_default() {
        let value: u32 = parse_env("WHOLESALE_TEST_UNSET_VARIABLE", "7").unwrap_or_default();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_parse_env_invalid_default_reports_key() {
        let err = parse_env::<u32>("WHOLESALE_TEST_UNSET_VARIABLE", "many");
        assert!(matches!(err, Err(ConfigError::InvalidEnvVar(key, _)) if key == "WHOLESALE_TEST_UNSET_VARIABLE"));
    }

    #[test]
    fn test_default_config_uses_memory_backend() {
        let config = StorefrontConfig::default();
        assert!(matches!(config.backend, BackendConfig::Memory));
        assert_eq!(config.whatsapp.domain, "wa.me");
        assert_eq!(config.customer_sync.attempts, 3);
    }
}
