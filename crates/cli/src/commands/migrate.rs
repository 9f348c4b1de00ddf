//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! WHOLESALE_DATABASE_URL=postgres://... wholesale migrate
//! ```
//!
//! # Environment Variables
//!
//! - `WHOLESALE_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! Migrations live in `crates/storefront/migrations/`. The local and memory
//! backends need none.

use secrecy::SecretString;

use wholesale_storefront::db;

use super::CliError;

/// Run storefront database migrations.
pub async fn run() -> Result<(), CliError> {
    let database_url = std::env::var("WHOLESALE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| {
            wholesale_storefront::config::ConfigError::MissingEnvVar(
                "WHOLESALE_DATABASE_URL".to_string(),
            )
        })?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&SecretString::from(database_url)).await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Storefront migrations complete");
    Ok(())
}
