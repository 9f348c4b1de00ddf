//! Checkout: turn the cart into an order.

use std::sync::Arc;

use tracing::{error, info, instrument};

use wholesale_core::{NewOrder, Order, Phone};

use crate::error::{Result, StoreError};
use crate::services::cart::Cart;
use crate::services::catalog::Catalog;
use crate::services::orders::OrderLedger;

/// Customer details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Places orders from the shopper's cart.
#[derive(Debug, Clone)]
pub struct Checkout {
    cart: Arc<Cart>,
    catalog: Arc<Catalog>,
    orders: Arc<OrderLedger>,
}

impl Checkout {
    #[must_use]
    pub const fn new(cart: Arc<Cart>, catalog: Arc<Catalog>, orders: Arc<OrderLedger>) -> Self {
        Self {
            cart,
            catalog,
            orders,
        }
    }

    /// Place an order for everything in the cart and empty it.
    ///
    /// An empty cart is rejected before anything is written. Once the order
    /// is stored it is returned, even if the cart cannot be cleared.
    ///
    /// # Errors
    ///
    /// - `StoreError::EmptyCart` if the cart has no lines
    /// - `StoreError::Validation` / `StoreError::Phone` for bad form fields
    /// - `StoreError::NotFound` if a product was deleted since it was added
    /// - `StoreError::InsufficientStock` if a line exceeds current stock
    /// - `StoreError::Persistence` if the order cannot be stored
    #[instrument(skip(self, form))]
    pub async fn place_order(&self, form: &CheckoutForm) -> Result<Order> {
        let items = self.cart.lines().await;
        if items.is_empty() {
            return Err(StoreError::EmptyCart);
        }

        let name = form.name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("Please enter your name".into()));
        }
        let phone = Phone::parse(&form.phone)?;
        let address = form.address.trim();
        if address.is_empty() {
            return Err(StoreError::Validation(
                "Please enter a delivery address".into(),
            ));
        }

        for line in &items {
            let product = self
                .catalog
                .get(line.product_id())
                .await
                .ok_or_else(|| StoreError::not_found("Product", line.product_id()))?;
            if line.quantity > product.stock {
                return Err(StoreError::InsufficientStock {
                    product_id: product.id,
                    requested: line.quantity,
                    available: product.stock,
                });
            }
        }

        let total_amount = self.cart.total().await;
        let order = self
            .orders
            .create_order(NewOrder {
                customer_name: name.to_owned(),
                customer_phone: phone,
                customer_address: address.to_owned(),
                items,
                total_amount,
            })
            .await?;

        // The order is already stored, so a failed clear is logged only.
        if let Err(e) = self.cart.clear().await {
            error!(order_id = %order.id, error = %e, "Order placed but cart not cleared");
        }
        info!(order_id = %order.id, "Checkout complete");
        Ok(order)
    }
}
