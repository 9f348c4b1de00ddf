//! In-process backend.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{Persistence, PersistenceError};

/// Keeps records in a map for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl Persistence for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, PersistenceError> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), PersistenceError> {
        self.records
            .write()
            .await
            .insert(key.to_owned(), value.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.records.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);

        store.set("k", &json!([1, 2])).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!([1, 2])));
        assert_eq!(store.len().await, 1);

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove("missing").await.is_ok());
    }
}
