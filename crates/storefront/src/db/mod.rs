//! Persistence adapter for the storefront stores.
//!
//! Every store reads and writes whole records through the [`Persistence`]
//! trait: `get`/`set`/`remove` of one JSON value per key. The backend is
//! chosen once at startup by [`open`] and shared as `Arc<dyn Persistence>`.
//!
//! ## Backends
//!
//! - [`MemoryStore`] - process-local, used by tests and `WHOLESALE_BACKEND=memory`
//! - [`FileStore`] - one `<key>.json` file per record in the data directory
//! - [`PgStore`] - one JSONB row per record in `wholesale.records`
//!
//! # Migrations
//!
//! The `PostgreSQL` schema lives in `crates/storefront/migrations/` and is run via:
//! ```bash
//! cargo run -p wholesale-cli -- migrate
//! ```

mod file;
mod memory;
mod postgres;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::config::BackendConfig;

/// Record keys shared by every backend.
pub mod keys {
    /// The product catalog.
    pub const PRODUCTS: &str = "wholesale_products";

    /// The shopper's cart.
    pub const CART: &str = "wholesale_cart";

    /// All placed orders, newest first.
    pub const ORDERS: &str = "wholesale_orders";

    /// Customers derived from orders.
    pub const CUSTOMERS: &str = "wholesale_customers";

    /// Orders whose customer update has not been applied yet.
    pub const CUSTOMER_OUTBOX: &str = "wholesale_customer_outbox";

    /// Admin session flag and start time.
    pub const ADMIN_AUTH: &str = "admin_auth";
}

/// Errors raised by a persistence backend.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem error from the local backend.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backend refused or could not complete the operation.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// How the catalog should be listed for a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogOrdering {
    /// The order products were added in.
    #[default]
    Insertion,
    /// Alphabetical by product name.
    ByName,
}

/// Key/value storage for whole records.
#[async_trait]
pub trait Persistence: Send + Sync + std::fmt::Debug {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Value>, PersistenceError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: &Value) -> Result<(), PersistenceError>;

    /// Delete the value stored under `key`. Missing keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), PersistenceError>;

    /// Listing order the catalog uses with this backend.
    fn catalog_ordering(&self) -> CatalogOrdering {
        CatalogOrdering::Insertion
    }
}

/// Read and decode a record.
///
/// # Errors
///
/// Returns `PersistenceError::Serialization` if the stored value does not
/// decode as `T`, or the backend's own error.
pub async fn load<T: DeserializeOwned>(
    store: &dyn Persistence,
    key: &str,
) -> Result<Option<T>, PersistenceError> {
    match store.get(key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Encode and write a record.
///
/// # Errors
///
/// Returns `PersistenceError::Serialization` if `value` cannot be encoded,
/// or the backend's own error.
pub async fn save<T: Serialize + ?Sized>(
    store: &dyn Persistence,
    key: &str,
    value: &T,
) -> Result<(), PersistenceError> {
    let value = serde_json::to_value(value)?;
    store.set(key, &value).await
}

/// Open the configured backend.
///
/// # Errors
///
/// Returns `PersistenceError` if the data directory cannot be created or
/// the database cannot be reached.
pub async fn open(config: &BackendConfig) -> Result<Arc<dyn Persistence>, PersistenceError> {
    let store: Arc<dyn Persistence> = match config {
        BackendConfig::Memory => Arc::new(MemoryStore::new()),
        BackendConfig::Local { data_dir } => Arc::new(FileStore::open(data_dir).await?),
        BackendConfig::Postgres { database_url } => {
            Arc::new(PgStore::new(create_pool(database_url).await?))
        }
    };
    Ok(store)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
