//! Product catalog store.
//!
//! Owns the product list. Mutations are serialised behind one async mutex,
//! written to the backend first, then swapped into memory and published.

mod seed;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use wholesale_core::{Price, Product, ProductDraft, ProductId};

use crate::db::{self, CatalogOrdering, Persistence, keys};
use crate::error::{Result, StoreError};
use crate::services::publisher::{Publisher, Subscription};

pub use seed::sample_products;

/// Outcome of a stock adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAdjustment {
    pub product_id: ProductId,
    /// Stock before the adjustment.
    pub previous: u32,
    /// Stock after the adjustment.
    pub current: u32,
    /// Units requested beyond what was in stock. Non-zero means the stock
    /// was clamped at 0.
    pub shortfall: u32,
}

impl StockAdjustment {
    /// Returns true if the request could not be fully covered.
    #[must_use]
    pub const fn is_short(&self) -> bool {
        self.shortfall > 0
    }
}

/// The product catalog.
#[derive(Debug)]
pub struct Catalog {
    persistence: Arc<dyn Persistence>,
    products: Mutex<Vec<Product>>,
    publisher: Publisher<Product>,
}

impl Catalog {
    /// Load the catalog, seeding the sample products into an empty store
    /// when `seed` is set.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the record cannot be read or the
    /// seed cannot be written.
    pub async fn load(persistence: Arc<dyn Persistence>, seed: bool) -> Result<Self> {
        let mut products: Vec<Product> = db::load(persistence.as_ref(), keys::PRODUCTS)
            .await?
            .unwrap_or_default();

        if products.is_empty() && seed {
            products = sample_products();
            db::save(persistence.as_ref(), keys::PRODUCTS, &products).await?;
            info!(count = products.len(), "Seeded sample catalog");
        }

        Ok(Self {
            persistence,
            products: Mutex::new(products),
            publisher: Publisher::new(),
        })
    }

    /// Register a listener for catalog snapshots.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[Product]) + Send + Sync + 'static,
    {
        self.publisher.subscribe(listener)
    }

    /// Current products, by name for backends that list that way and in
    /// insertion order otherwise.
    pub async fn list(&self) -> Vec<Product> {
        let products = self.products.lock().await;
        self.ordered(&products)
    }

    /// Look up a product.
    pub async fn get(&self, id: &ProductId) -> Option<Product> {
        self.products
            .lock()
            .await
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }

    /// Distinct categories in first-seen order.
    pub async fn categories(&self) -> Vec<String> {
        let products = self.products.lock().await;
        let mut categories: Vec<String> = Vec::new();
        for product in self.ordered(&products) {
            if !categories.contains(&product.category) {
                categories.push(product.category);
            }
        }
        categories
    }

    /// Case-insensitive search over name, category and description,
    /// optionally restricted to one category.
    pub async fn search(&self, term: &str, category: Option<&str>) -> Vec<Product> {
        let term = term.trim().to_lowercase();
        self.list()
            .await
            .into_iter()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .filter(|p| term.is_empty() || p.matches(&term))
            .collect()
    }

    /// Add a product, assigning an ID when the draft has none.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for an empty name, a negative price
    /// or an ID that is already taken.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn add(&self, draft: ProductDraft) -> Result<Product> {
        validate(&draft.name, draft.price, draft.cost_price)?;

        let mut products = self.products.lock().await;
        let id = match draft.id.clone() {
            Some(id) if products.iter().any(|p| p.id == id) => {
                return Err(StoreError::Validation(format!(
                    "A product with ID {id} already exists"
                )));
            }
            Some(id) => id,
            None => ProductId::generate(),
        };

        let product = draft.into_product(id);
        let mut next = products.clone();
        next.push(product.clone());
        self.commit(&mut products, next).await?;

        info!(product_id = %product.id, "Product added");
        Ok(product)
    }

    /// Replace a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no product has this ID.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn update(&self, product: Product) -> Result<Product> {
        validate(&product.name, product.price, product.cost_price)?;

        let mut products = self.products.lock().await;
        let mut next = products.clone();
        *entry_mut(&mut next, &product.id)? = product.clone();
        self.commit(&mut products, next).await?;

        info!("Product updated");
        Ok(product)
    }

    /// Remove a product. Orders keep their own snapshot of it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no product has this ID.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: &ProductId) -> Result<Product> {
        let mut products = self.products.lock().await;
        let index = position(&products, id)?;

        let mut next = products.clone();
        let removed = next.remove(index);
        self.commit(&mut products, next).await?;

        info!("Product deleted");
        Ok(removed)
    }

    /// Take `delta` units out of stock, clamping at 0.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no product has this ID.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn adjust_stock(&self, id: &ProductId, delta: u32) -> Result<StockAdjustment> {
        let mut products = self.products.lock().await;
        let mut next = products.clone();
        let entry = entry_mut(&mut next, id)?;

        let previous = entry.stock;
        let current = previous.saturating_sub(delta);
        let shortfall = delta.saturating_sub(previous);
        entry.stock = current;
        self.commit(&mut products, next).await?;

        if shortfall > 0 {
            warn!(
                requested = delta,
                available = previous,
                shortfall,
                "Insufficient stock, clamped at 0"
            );
        } else {
            info!(previous, current, "Stock adjusted");
        }

        Ok(StockAdjustment {
            product_id: id.clone(),
            previous,
            current,
            shortfall,
        })
    }

    /// Persist `next`, swap it in and notify listeners.
    async fn commit(&self, current: &mut Vec<Product>, next: Vec<Product>) -> Result<()> {
        db::save(self.persistence.as_ref(), keys::PRODUCTS, &next).await?;
        *current = next;
        self.publisher.publish(&self.ordered(current));
        Ok(())
    }

    fn ordered(&self, products: &[Product]) -> Vec<Product> {
        let mut list = products.to_vec();
        if self.persistence.catalog_ordering() == CatalogOrdering::ByName {
            list.sort_by(|a, b| a.name.cmp(&b.name));
        }
        list
    }
}

fn validate(name: &str, price: Price, cost_price: Price) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StoreError::Validation("Product name is required".into()));
    }
    if price.is_negative() || cost_price.is_negative() {
        return Err(StoreError::Validation("Prices cannot be negative".into()));
    }
    Ok(())
}

fn position(products: &[Product], id: &ProductId) -> Result<usize> {
    products
        .iter()
        .position(|p| &p.id == id)
        .ok_or_else(|| StoreError::not_found("Product", id))
}

fn entry_mut<'a>(products: &'a mut [Product], id: &ProductId) -> Result<&'a mut Product> {
    products
        .iter_mut()
        .find(|p| &p.id == id)
        .ok_or_else(|| StoreError::not_found("Product", id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn empty_catalog() -> Catalog {
        Catalog::load(Arc::new(MemoryStore::new()), false).await.unwrap()
    }

    fn draft(name: &str, stock: u32) -> ProductDraft {
        ProductDraft {
            name: name.to_owned(),
            category: "Grains".to_owned(),
            price: Price::from_rupees(100),
            stock,
            ..ProductDraft::default()
        }
    }

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let store: Arc<dyn Persistence> = Arc::new(MemoryStore::new());
        let catalog = Catalog::load(Arc::clone(&store), true).await.unwrap();
        assert_eq!(catalog.list().await.len(), 12);

        catalog.delete(&ProductId::new("1")).await.unwrap();
        let reloaded = Catalog::load(store, true).await.unwrap();
        assert_eq!(reloaded.list().await.len(), 11);
    }

    #[tokio::test]
    async fn test_add_assigns_fresh_id() {
        let catalog = empty_catalog().await;
        let product = catalog.add(draft("Rice", 10)).await.unwrap();

        let list = catalog.list().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0], product);
        assert!(!product.id.as_str().is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_duplicate_id_and_empty_name() {
        let catalog = empty_catalog().await;
        let mut with_id = draft("Rice", 10);
        with_id.id = Some(ProductId::new("1"));
        catalog.add(with_id.clone()).await.unwrap();

        assert!(matches!(
            catalog.add(with_id).await,
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            catalog.add(draft("  ", 1)).await,
            Err(StoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let catalog = empty_catalog().await;
        let ghost = draft("Ghost", 1).into_product(ProductId::new("missing"));

        assert!(matches!(
            catalog.update(ghost).await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            catalog.delete(&ProductId::new("missing")).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_adjust_stock_clamps_at_zero() {
        let catalog = empty_catalog().await;
        let product = catalog.add(draft("Rice", 5)).await.unwrap();

        let ok = catalog.adjust_stock(&product.id, 3).await.unwrap();
        assert_eq!((ok.previous, ok.current, ok.shortfall), (5, 2, 0));

        let short = catalog.adjust_stock(&product.id, 7).await.unwrap();
        assert_eq!((short.previous, short.current, short.shortfall), (2, 0, 5));
        assert!(short.is_short());
        assert_eq!(catalog.get(&product.id).await.unwrap().stock, 0);
    }

    #[tokio::test]
    async fn test_search_and_categories() {
        let catalog = Catalog::load(Arc::new(MemoryStore::new()), true)
            .await
            .unwrap();

        let categories = catalog.categories().await;
        assert_eq!(categories[0], "Grains");
        assert!(categories.contains(&"Dairy".to_owned()));

        let tea = catalog.search("TEA", None).await;
        assert_eq!(tea.len(), 1);
        assert_eq!(tea[0].name, "Tea (500g)");

        let dairy = catalog.search("", Some("Dairy")).await;
        assert_eq!(dairy.len(), 2);
    }

    #[tokio::test]
    async fn test_publishes_after_successful_mutation() {
        let catalog = empty_catalog().await;
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let _subscription = catalog.subscribe(move |products| {
            counter.store(products.len(), Ordering::SeqCst);
        });

        catalog.add(draft("Rice", 1)).await.unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        let _ = catalog.delete(&ProductId::new("missing")).await;
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
