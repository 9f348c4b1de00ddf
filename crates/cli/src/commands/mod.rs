//! CLI command implementations.
//!
//! Each command opens the configured storefront (and admin state where the
//! command is gated), performs one operation and prints the result.

pub mod cart;
pub mod catalog;
pub mod customers;
pub mod dashboard;
pub mod migrate;
pub mod orders;
pub mod session;

use std::io::{self, BufRead, Write};

use rust_decimal::Decimal;
use thiserror::Error;

use wholesale_admin::{AdminConfig, AdminError, AdminState};
use wholesale_core::Price;
use wholesale_storefront::config::ConfigError;
use wholesale_storefront::db::PersistenceError;
use wholesale_storefront::{StoreError, Storefront, StorefrontConfig};

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Storefront configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Admin configuration is invalid.
    #[error("Admin configuration error: {0}")]
    AdminConfig(#[from] wholesale_admin::config::ConfigError),

    /// A store operation failed.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// An admin operation failed.
    #[error("{0}")]
    Admin(#[from] AdminError),

    /// Backend could not be opened.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A command-line value was rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operator declined a destructive action.
    #[error("Cancelled")]
    Cancelled,

    /// Reading the confirmation answer failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Message shown on stderr.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Store(err) => err.user_message(),
            Self::Admin(err) => err.user_message(),
            _ => self.to_string(),
        }
    }
}

/// Open the storefront from environment configuration.
pub async fn open_storefront() -> Result<Storefront, CliError> {
    let config = StorefrontConfig::from_env()?;
    Ok(Storefront::open(config).await?)
}

/// Open the storefront and the admin state over it.
pub async fn open_admin() -> Result<AdminState, CliError> {
    let storefront = open_storefront().await?;
    let config = AdminConfig::from_env()?;
    Ok(AdminState::new(storefront, config).await?)
}

/// Parse a rupee amount such as `3500` or `99.5`.
pub fn parse_price(s: &str) -> Result<Price, String> {
    let amount: Decimal = s.trim().parse().map_err(|e| format!("invalid amount '{s}': {e}"))?;
    if amount.is_sign_negative() {
        return Err(format!("amount cannot be negative: {s}"));
    }
    Ok(Price::new(amount))
}

/// Ask the operator to confirm a destructive action on stdin.
///
/// `yes` skips the prompt (`--yes` on the command line).
pub fn confirm(prompt: &str, yes: bool) -> Result<(), CliError> {
    confirm_from(&mut io::stdin().lock(), &mut io::stderr(), prompt, yes)
}

fn confirm_from(
    input: &mut impl BufRead,
    output: &mut impl Write,
    prompt: &str,
    yes: bool,
) -> Result<(), CliError> {
    if yes {
        return Ok(());
    }
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Ok(()),
        _ => Err(CliError::Cancelled),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn answer(input: &str, yes: bool) -> (Result<(), CliError>, String) {
        let mut output = Vec::new();
        let prompt = "Delete order ORD-1?";
        let result = confirm_from(&mut Cursor::new(input), &mut output, prompt, yes);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_confirm_accepts_yes() {
        let (result, prompt) = answer("y\n", false);
        assert!(result.is_ok());
        assert_eq!(prompt, "Delete order ORD-1? [y/N] ");
        assert!(answer("YES\n", false).0.is_ok());
    }

    #[test]
    fn test_confirm_defaults_to_cancel() {
        assert!(matches!(answer("\n", false).0, Err(CliError::Cancelled)));
        assert!(matches!(answer("no\n", false).0, Err(CliError::Cancelled)));
        assert!(matches!(answer("", false).0, Err(CliError::Cancelled)));
    }

    #[test]
    fn test_yes_flag_skips_prompt() {
        let (result, prompt) = answer("", true);
        assert!(result.is_ok());
        assert!(prompt.is_empty());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("3500").unwrap(), Price::from_rupees(3500));
        assert_eq!(parse_price(" 99.5 ").unwrap().plain(), "99.5");
        assert!(parse_price("-1").is_err());
        assert!(parse_price("abc").is_err());
    }
}
