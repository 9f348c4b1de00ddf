//! Cart lines, also used as the immutable item snapshots inside orders.

use serde::{Deserialize, Serialize};

use crate::models::Product;
use crate::types::{Price, ProductId};

/// A product snapshot and the quantity requested.
///
/// The product is copied, not referenced: once a line is captured in an
/// order, later catalog edits or deletions do not change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Create a line.
    #[must_use]
    pub const fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// ID of the snapshotted product.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// `price * quantity`.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.product.price.times(self.quantity)
    }

    /// `cost_price * quantity`.
    #[must_use]
    pub fn cost(&self) -> Price {
        self.product.cost_price.times(self.quantity)
    }
}
