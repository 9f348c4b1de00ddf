//! Storefront state: the stores, constructed once and wired together.

use std::sync::Arc;

use tracing::info;

use crate::config::StorefrontConfig;
use crate::db::{self, Persistence};
use crate::error::Result;
use crate::services::{Cart, Catalog, Checkout, CustomerRegistry, OrderLedger};

/// Shared storefront state.
///
/// This struct is cheaply cloneable via `Arc`. The order ledger holds its
/// own handles to the catalog and customer registry.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    persistence: Arc<dyn Persistence>,
    catalog: Arc<Catalog>,
    cart: Arc<Cart>,
    customers: Arc<CustomerRegistry>,
    orders: Arc<OrderLedger>,
}

impl Storefront {
    /// Open the configured backend and load every store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the backend cannot be opened or
    /// a record cannot be read.
    pub async fn open(config: StorefrontConfig) -> Result<Self> {
        let persistence = db::open(&config.backend).await?;
        Self::with_persistence(config, persistence).await
    }

    /// Load every store from an already opened backend.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if a record cannot be read.
    pub async fn with_persistence(
        config: StorefrontConfig,
        persistence: Arc<dyn Persistence>,
    ) -> Result<Self> {
        let catalog = Arc::new(Catalog::load(Arc::clone(&persistence), config.seed_catalog).await?);
        let cart = Arc::new(Cart::load(Arc::clone(&persistence)).await?);
        let customers = Arc::new(
            CustomerRegistry::load(Arc::clone(&persistence), config.whatsapp.dialing.clone())
                .await?,
        );
        let orders = Arc::new(
            OrderLedger::load(
                Arc::clone(&persistence),
                Arc::clone(&catalog),
                Arc::clone(&customers),
                config.whatsapp.clone(),
                config.customer_sync,
            )
            .await?,
        );

        info!(ordering = ?persistence.catalog_ordering(), "Storefront loaded");

        Ok(Self {
            inner: Arc::new(StorefrontInner {
                config,
                persistence,
                catalog,
                cart,
                customers,
                orders,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The persistence backend shared by every store.
    #[must_use]
    pub fn persistence(&self) -> &Arc<dyn Persistence> {
        &self.inner.persistence
    }

    /// The product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.inner.catalog
    }

    /// The shopper's cart.
    #[must_use]
    pub fn cart(&self) -> &Arc<Cart> {
        &self.inner.cart
    }

    /// The customer registry.
    #[must_use]
    pub fn customers(&self) -> &Arc<CustomerRegistry> {
        &self.inner.customers
    }

    /// The order ledger.
    #[must_use]
    pub fn orders(&self) -> &Arc<OrderLedger> {
        &self.inner.orders
    }

    /// Checkout over this storefront's cart, catalog and ledger.
    #[must_use]
    pub fn checkout(&self) -> Checkout {
        Checkout::new(
            Arc::clone(&self.inner.cart),
            Arc::clone(&self.inner.catalog),
            Arc::clone(&self.inner.orders),
        )
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("config", &self.inner.config)
            .field("persistence", &self.inner.persistence)
            .finish_non_exhaustive()
    }
}
