//! Customers derived from placed orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Order;
use crate::types::{CustomerId, OrderId, Phone, Price};

/// A customer, identified in practice by phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub phone: Phone,
    pub address: String,
    pub total_orders: u32,
    pub total_spent: Price,
    pub last_order_date: DateTime<Utc>,
    /// IDs of every order recorded for this customer, oldest first.
    #[serde(default)]
    pub orders: Vec<OrderId>,
}

impl Customer {
    /// First-order constructor.
    #[must_use]
    pub fn from_order(order: &Order, now: DateTime<Utc>) -> Self {
        Self {
            id: CustomerId::generate(),
            name: order.customer_name.clone(),
            phone: order.customer_phone.clone(),
            address: order.customer_address.clone(),
            total_orders: 1,
            total_spent: order.total_amount,
            last_order_date: now,
            orders: vec![order.id.clone()],
        }
    }

    /// Fold a further order into the running totals. Name and address take
    /// the latest values.
    pub fn apply_order(&mut self, order: &Order, now: DateTime<Utc>) {
        self.name.clone_from(&order.customer_name);
        self.address.clone_from(&order.customer_address);
        self.total_orders += 1;
        self.total_spent = self.total_spent + order.total_amount;
        self.last_order_date = now;
        self.orders.push(order.id.clone());
    }

    /// Returns true if the order has already been counted.
    #[must_use]
    pub fn has_order(&self, id: &OrderId) -> bool {
        self.orders.contains(id)
    }
}
