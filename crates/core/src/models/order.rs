//! Placed orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::CartLine;
use crate::types::{OrderId, OrderStatus, Phone, Price};

/// An order as captured at checkout.
///
/// Items and total are fixed when the order is placed; afterwards only the
/// status changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_phone: Phone,
    pub customer_address: String,
    /// Snapshot of the cart at placement time.
    pub items: Vec<CartLine>,
    /// Computed once at placement, never recomputed.
    pub total_amount: Price,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
}

impl Order {
    /// Build a pending order with a fresh ID.
    #[must_use]
    pub fn place(new: NewOrder, order_date: DateTime<Utc>) -> Self {
        Self {
            id: OrderId::generate(),
            customer_name: new.customer_name,
            customer_phone: new.customer_phone,
            customer_address: new.customer_address,
            items: new.items,
            total_amount: new.total_amount,
            status: OrderStatus::Pending,
            order_date,
        }
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}

/// Checkout input for a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_phone: Phone,
    pub customer_address: String,
    pub items: Vec<CartLine>,
    pub total_amount: Price,
}
