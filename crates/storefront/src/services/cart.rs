//! Shopper cart store.
//!
//! One line per product ID; repeated adds accumulate. Every mutation is
//! persisted immediately under `wholesale_cart`.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, instrument};

use wholesale_core::{CartLine, Price, Product, ProductId};

use crate::db::{self, Persistence, keys};
use crate::error::{Result, StoreError};
use crate::services::publisher::{Publisher, Subscription};

/// The current shopper's cart.
#[derive(Debug)]
pub struct Cart {
    persistence: Arc<dyn Persistence>,
    lines: Mutex<Vec<CartLine>>,
    publisher: Publisher<CartLine>,
}

impl Cart {
    /// Load the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the record cannot be read.
    pub async fn load(persistence: Arc<dyn Persistence>) -> Result<Self> {
        let lines = db::load(persistence.as_ref(), keys::CART)
            .await?
            .unwrap_or_default();

        Ok(Self {
            persistence,
            lines: Mutex::new(lines),
            publisher: Publisher::new(),
        })
    }

    /// Register a listener for cart snapshots.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[CartLine]) + Send + Sync + 'static,
    {
        self.publisher.subscribe(listener)
    }

    /// Add `quantity` units of `product`, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for a zero quantity and
    /// `StoreError::QuantityExceedsStock` if the line would hold more than
    /// the product's stock.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add(&self, product: &Product, quantity: u32) -> Result<CartLine> {
        if quantity == 0 {
            return Err(StoreError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let mut lines = self.lines.lock().await;
        let mut next = lines.clone();

        let line = match next.iter_mut().find(|l| l.product_id() == &product.id) {
            Some(line) => {
                let requested = line.quantity.saturating_add(quantity);
                check_stock(product, requested)?;
                line.quantity = requested;
                line.clone()
            }
            None => {
                check_stock(product, quantity)?;
                let line = CartLine::new(product.clone(), quantity);
                next.push(line.clone());
                line
            }
        };

        self.commit(&mut lines, next).await?;
        debug!(total_quantity = line.quantity, "Added to cart");
        Ok(line)
    }

    /// Set the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product is not in the cart and
    /// `StoreError::Validation` if `quantity` is outside `1..=stock`.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn set_quantity(&self, product_id: &ProductId, quantity: u32) -> Result<CartLine> {
        let mut lines = self.lines.lock().await;
        let mut next = lines.clone();

        let line = next
            .iter_mut()
            .find(|l| l.product_id() == product_id)
            .ok_or_else(|| StoreError::not_found("Cart item", product_id))?;

        let stock = line.product.stock;
        if quantity == 0 || quantity > stock {
            return Err(StoreError::Validation(format!(
                "Quantity must be between 1 and {stock}"
            )));
        }
        line.quantity = quantity;
        let line = line.clone();

        self.commit(&mut lines, next).await?;
        Ok(line)
    }

    /// Remove a product's line. Returns false if it was not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the cart cannot be saved.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove(&self, product_id: &ProductId) -> Result<bool> {
        let mut lines = self.lines.lock().await;
        if !lines.iter().any(|l| l.product_id() == product_id) {
            return Ok(false);
        }

        let next = lines
            .iter()
            .filter(|l| l.product_id() != product_id)
            .cloned()
            .collect();
        self.commit(&mut lines, next).await?;
        Ok(true)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the cart cannot be saved.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<()> {
        let mut lines = self.lines.lock().await;
        self.commit(&mut lines, Vec::new()).await
    }

    /// Current lines.
    pub async fn lines(&self) -> Vec<CartLine> {
        self.lines.lock().await.clone()
    }

    /// Returns true if the cart has no lines.
    pub async fn is_empty(&self) -> bool {
        self.lines.lock().await.is_empty()
    }

    /// Sum of `price * quantity`, recomputed on every call.
    pub async fn total(&self) -> Price {
        self.lines.lock().await.iter().map(CartLine::subtotal).sum()
    }

    /// Sum of quantities.
    pub async fn count(&self) -> u32 {
        self.lines.lock().await.iter().map(|l| l.quantity).sum()
    }

    async fn commit(&self, current: &mut Vec<CartLine>, next: Vec<CartLine>) -> Result<()> {
        db::save(self.persistence.as_ref(), keys::CART, &next).await?;
        *current = next;
        self.publisher.publish(current);
        Ok(())
    }
}

fn check_stock(product: &Product, requested: u32) -> Result<()> {
    if requested > product.stock {
        return Err(StoreError::QuantityExceedsStock {
            product_id: product.id.clone(),
            requested,
            available: product.stock,
        });
    }
    Ok(())
}
