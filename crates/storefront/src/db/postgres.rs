//! `PostgreSQL` document backend.
//!
//! Records live in `wholesale.records` as one JSONB row per key. Several
//! storefront processes can share the table; each write replaces the whole
//! record.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::{CatalogOrdering, Persistence, PersistenceError};

/// Stores records in a shared database table.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Persistence for PgStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, PersistenceError> {
        let value = sqlx::query_scalar::<_, Value>(
            r"
            SELECT value FROM wholesale.records
            WHERE key = $1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), PersistenceError> {
        sqlx::query(
            r"
            INSERT INTO wholesale.records (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()
            ",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        sqlx::query("DELETE FROM wholesale.records WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    fn catalog_ordering(&self) -> CatalogOrdering {
        CatalogOrdering::ByName
    }
}
