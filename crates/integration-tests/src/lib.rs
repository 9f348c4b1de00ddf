//! Cross-crate tests for the wholesale storefront.
//!
//! The tests in `tests/` drive the storefront and admin crates together
//! through their public APIs. Everything runs in-process against
//! [`MemoryStore`] or a temporary [`FileStore`] directory, so no database
//! or network is needed:
//!
//! ```bash
//! cargo test -p wholesale-integration-tests
//! ```
//!
//! [`FlakyStore`] wraps the memory backend to count writes and to fail
//! writes for chosen keys, which is how the customer outbox and the
//! "nothing written" paths are exercised.
//!
//! [`FileStore`]: wholesale_storefront::db::FileStore

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::Value;
use tokio::sync::RwLock;

use wholesale_admin::{AdminConfig, AdminState};
use wholesale_core::{Price, Product, ProductDraft};
use wholesale_storefront::config::{BackendConfig, RetryPolicy};
use wholesale_storefront::db::{MemoryStore, Persistence, PersistenceError};
use wholesale_storefront::{Storefront, StorefrontConfig};

/// Admin password used by [`admin`].
pub const ADMIN_PASSWORD: &str = "wholesale-test";

/// Memory backend that counts writes and can be told to fail them.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: RwLock<HashSet<String>>,
    writes: AtomicUsize,
}

impl FlakyStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `set` and `remove` of `key` fail until [`Self::heal`].
    pub async fn fail_writes(&self, key: &str) {
        self.failing.write().await.insert(key.to_owned());
    }

    /// Let writes of `key` through again.
    pub async fn heal(&self, key: &str) {
        self.failing.write().await.remove(key);
    }

    /// Successful writes so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    async fn check(&self, key: &str) -> Result<(), PersistenceError> {
        if self.failing.read().await.contains(key) {
            return Err(PersistenceError::Unavailable(format!(
                "writes to '{key}' are switched off"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Persistence for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, PersistenceError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), PersistenceError> {
        self.check(key).await?;
        self.inner.set(key, value).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.check(key).await?;
        self.inner.remove(key).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Storefront config for tests: memory backend, no retry delay.
#[must_use]
pub fn test_config(seed_catalog: bool) -> StorefrontConfig {
    StorefrontConfig {
        backend: BackendConfig::Memory,
        seed_catalog,
        customer_sync: RetryPolicy {
            attempts: 2,
            backoff: Duration::ZERO,
        },
        ..StorefrontConfig::default()
    }
}

/// Storefront over the given backend with an empty catalog.
///
/// # Errors
///
/// Returns the storefront's error if a store cannot be loaded.
pub async fn storefront(
    persistence: Arc<dyn Persistence>,
) -> wholesale_storefront::Result<Storefront> {
    Storefront::with_persistence(test_config(false), persistence).await
}

/// Admin state over `storefront`, already logged in, writing invoices into
/// `invoice_dir`.
///
/// # Errors
///
/// Returns the admin error if the gate cannot be restored or the login
/// fails.
pub async fn admin(
    storefront: Storefront,
    invoice_dir: &Path,
) -> wholesale_admin::error::Result<AdminState> {
    let config = AdminConfig {
        password: SecretString::from(ADMIN_PASSWORD),
        invoice_dir: invoice_dir.to_path_buf(),
        ..AdminConfig::default()
    };
    let admin = AdminState::new(storefront, config).await?;
    admin.login("admin", ADMIN_PASSWORD).await?;
    Ok(admin)
}

/// Draft for a product with the given name, price and stock.
#[must_use]
pub fn product(name: &str, rupees: i64, stock: u32) -> ProductDraft {
    ProductDraft {
        name: name.to_owned(),
        category: "Grains".to_owned(),
        price: Price::from_rupees(rupees),
        stock,
        ..ProductDraft::default()
    }
}

/// Add a product straight to the catalog.
///
/// # Errors
///
/// Returns the catalog's error if the draft is invalid or cannot be stored.
pub async fn stock_product(
    storefront: &Storefront,
    name: &str,
    rupees: i64,
    stock: u32,
) -> wholesale_storefront::Result<Product> {
    storefront.catalog().add(product(name, rupees, stock)).await
}
