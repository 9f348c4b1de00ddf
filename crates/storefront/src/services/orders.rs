//! Order ledger.
//!
//! Creating an order is a two-step saga: the order is written first, then
//! the customer registry is updated. The second step is retried with
//! backoff; if it still fails the order ID goes to a persisted outbox that
//! [`OrderLedger::replay_customer_outbox`] drains later.
//!
//! Confirming an order decrements stock exactly once. Nothing here ever
//! restores stock.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use wholesale_core::{NewOrder, Order, OrderId, OrderStatus, ProductId};

use crate::config::{RetryPolicy, WhatsAppConfig};
use crate::db::{self, Persistence, keys};
use crate::error::{Result, StoreError};
use crate::services::catalog::{Catalog, StockAdjustment};
use crate::services::customers::CustomerRegistry;
use crate::services::publisher::{Publisher, Subscription};
use crate::services::whatsapp;

/// A line whose stock could not be adjusted during confirmation.
#[derive(Debug)]
pub struct StockFailure {
    pub product_id: ProductId,
    pub quantity: u32,
    pub error: StoreError,
}

/// Result of [`OrderLedger::set_status`].
#[derive(Debug)]
pub struct StatusChange {
    /// The order after the change.
    pub order: Order,
    /// Status before the change.
    pub previous: OrderStatus,
    /// Stock adjustments made because the order entered `Confirmed`.
    pub adjustments: Vec<StockAdjustment>,
    /// Lines that could not be adjusted.
    pub failures: Vec<StockFailure>,
}

impl StatusChange {
    /// Returns true if this change decremented stock.
    #[must_use]
    pub fn adjusted_stock(&self) -> bool {
        !self.adjustments.is_empty()
    }
}

/// Every placed order, newest first.
#[derive(Debug)]
pub struct OrderLedger {
    persistence: Arc<dyn Persistence>,
    catalog: Arc<Catalog>,
    customers: Arc<CustomerRegistry>,
    whatsapp: WhatsAppConfig,
    retry: RetryPolicy,
    orders: Mutex<Vec<Order>>,
    outbox: Mutex<Vec<OrderId>>,
    publisher: Publisher<Order>,
}

impl OrderLedger {
    /// Load orders and the pending customer outbox.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if either record cannot be read.
    pub async fn load(
        persistence: Arc<dyn Persistence>,
        catalog: Arc<Catalog>,
        customers: Arc<CustomerRegistry>,
        whatsapp: WhatsAppConfig,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let orders = db::load(persistence.as_ref(), keys::ORDERS)
            .await?
            .unwrap_or_default();
        let outbox: Vec<OrderId> = db::load(persistence.as_ref(), keys::CUSTOMER_OUTBOX)
            .await?
            .unwrap_or_default();

        if !outbox.is_empty() {
            warn!(pending = outbox.len(), "Customer updates pending from a previous run");
        }

        Ok(Self {
            persistence,
            catalog,
            customers,
            whatsapp,
            retry,
            orders: Mutex::new(orders),
            outbox: Mutex::new(outbox),
            publisher: Publisher::new(),
        })
    }

    /// Register a listener for order snapshots.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[Order]) + Send + Sync + 'static,
    {
        self.publisher.subscribe(listener)
    }

    /// Place a pending order, then record it against its customer.
    ///
    /// The order is returned once it is stored, even if the customer update
    /// had to be deferred to the outbox.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for blank customer fields or no
    /// items, and `StoreError::Persistence` if the order cannot be stored.
    #[instrument(skip(self, new), fields(phone = %new.customer_phone))]
    pub async fn create_order(&self, new: NewOrder) -> Result<Order> {
        validate(&new)?;

        let order = Order::place(new, Utc::now());
        {
            let mut orders = self.orders.lock().await;
            let mut next = Vec::with_capacity(orders.len() + 1);
            next.push(order.clone());
            next.extend(orders.iter().cloned());
            self.commit(&mut orders, next).await?;
        }
        info!(order_id = %order.id, total = %order.total_amount, "Order created");

        if let Err(e) = self.sync_customer(&order).await {
            error!(
                order_id = %order.id,
                error = %e,
                "Customer update failed, queued for replay"
            );
            if let Err(e) = self.enqueue(order.id.clone()).await {
                error!(order_id = %order.id, error = %e, "Could not queue customer update");
            }
        }

        Ok(order)
    }

    /// Retry the customer step for every order in the outbox. Orders that
    /// still fail stay queued; orders deleted since are dropped.
    ///
    /// Returns the number of orders synced.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the outbox cannot be saved.
    #[instrument(skip(self))]
    pub async fn replay_customer_outbox(&self) -> Result<usize> {
        let mut outbox = self.outbox.lock().await;
        if outbox.is_empty() {
            return Ok(0);
        }

        let mut remaining = Vec::new();
        let mut synced = 0;
        for id in outbox.iter() {
            let Some(order) = self.get(id).await else {
                warn!(order_id = %id, "Queued order no longer exists, dropping");
                continue;
            };
            match self.customers.record_order(&order).await {
                Ok(_) => synced += 1,
                Err(e) => {
                    warn!(order_id = %id, error = %e, "Customer update still failing");
                    remaining.push(id.clone());
                }
            }
        }

        db::save(self.persistence.as_ref(), keys::CUSTOMER_OUTBOX, &remaining).await?;
        *outbox = remaining;

        info!(synced, pending = outbox.len(), "Replayed customer outbox");
        Ok(synced)
    }

    /// Order IDs whose customer update is still pending.
    pub async fn pending_customer_updates(&self) -> Vec<OrderId> {
        self.outbox.lock().await.clone()
    }

    /// All orders, newest first.
    pub async fn list(&self) -> Vec<Order> {
        self.orders.lock().await.clone()
    }

    /// Orders with the given status, or all orders for `None`.
    pub async fn list_by_status(&self, status: Option<OrderStatus>) -> Vec<Order> {
        self.orders
            .lock()
            .await
            .iter()
            .filter(|o| status.is_none_or(|s| o.status == s))
            .cloned()
            .collect()
    }

    /// Look up an order.
    pub async fn get(&self, id: &OrderId) -> Option<Order> {
        self.orders
            .lock()
            .await
            .iter()
            .find(|o| &o.id == id)
            .cloned()
    }

    /// Move an order to `status`.
    ///
    /// Entering `Confirmed` from any other status takes each line's quantity
    /// out of stock. Lines whose product is gone, or whose adjustment fails,
    /// are reported in [`StatusChange::failures`] instead of aborting.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown order and
    /// `StoreError::Persistence` if the status cannot be saved.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn set_status(&self, id: &OrderId, status: OrderStatus) -> Result<StatusChange> {
        // Held through the stock step so concurrent confirmations of the
        // same order see each other.
        let mut orders = self.orders.lock().await;
        let mut next = orders.clone();
        let entry = next
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| StoreError::not_found("Order", id))?;
        let previous = entry.status;
        entry.status = status;
        let order = entry.clone();
        self.commit(&mut orders, next).await?;
        info!(previous = %previous, "Order status changed");

        let mut adjustments = Vec::new();
        let mut failures = Vec::new();
        if status == OrderStatus::Confirmed && previous != OrderStatus::Confirmed {
            for line in &order.items {
                match self
                    .catalog
                    .adjust_stock(line.product_id(), line.quantity)
                    .await
                {
                    Ok(adjustment) => adjustments.push(adjustment),
                    Err(e) => {
                        warn!(
                            product_id = %line.product_id(),
                            quantity = line.quantity,
                            error = %e,
                            "Could not adjust stock for confirmed order"
                        );
                        failures.push(StockFailure {
                            product_id: line.product_id().clone(),
                            quantity: line.quantity,
                            error: e,
                        });
                    }
                }
            }
        }

        Ok(StatusChange {
            order,
            previous,
            adjustments,
            failures,
        })
    }

    /// Remove an order. Stock and customer totals are left as they are.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown order.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn delete(&self, id: &OrderId) -> Result<Order> {
        let mut orders = self.orders.lock().await;
        let index = position(&orders, id)?;

        let mut next = orders.clone();
        let removed = next.remove(index);
        self.commit(&mut orders, next).await?;

        info!("Order deleted");
        Ok(removed)
    }

    /// Confirmation message for an order.
    #[must_use]
    pub fn whatsapp_message(&self, order: &Order) -> String {
        whatsapp::message(order)
    }

    /// Click-to-chat link for an order.
    #[must_use]
    pub fn whatsapp_link(&self, order: &Order) -> String {
        whatsapp::link(order, &self.whatsapp)
    }

    async fn sync_customer(&self, order: &Order) -> Result<()> {
        let attempts = self.retry.attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.customers.record_order(order).await {
                Ok(_) => return Ok(()),
                Err(e) if attempt < attempts => {
                    warn!(
                        order_id = %order.id,
                        attempt,
                        error = %e,
                        "Customer update failed, retrying"
                    );
                    tokio::time::sleep(self.retry.backoff * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn enqueue(&self, id: OrderId) -> Result<()> {
        let mut outbox = self.outbox.lock().await;
        let mut next = outbox.clone();
        next.push(id);
        db::save(self.persistence.as_ref(), keys::CUSTOMER_OUTBOX, &next).await?;
        *outbox = next;
        Ok(())
    }

    async fn commit(&self, current: &mut Vec<Order>, next: Vec<Order>) -> Result<()> {
        db::save(self.persistence.as_ref(), keys::ORDERS, &next).await?;
        *current = next;
        self.publisher.publish(current);
        Ok(())
    }
}

fn validate(new: &NewOrder) -> Result<()> {
    if new.customer_name.trim().is_empty() {
        return Err(StoreError::Validation("Customer name is required".into()));
    }
    if new.customer_address.trim().is_empty() {
        return Err(StoreError::Validation("Delivery address is required".into()));
    }
    if new.items.is_empty() {
        return Err(StoreError::Validation("An order needs at least one item".into()));
    }
    Ok(())
}

fn position(orders: &[Order], id: &OrderId) -> Result<usize> {
    orders
        .iter()
        .position(|o| &o.id == id)
        .ok_or_else(|| StoreError::not_found("Order", id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use wholesale_core::{CartLine, DialingPlan, Phone};

    struct Fixture {
        catalog: Arc<Catalog>,
        customers: Arc<CustomerRegistry>,
        ledger: OrderLedger,
    }

    async fn fixture() -> Fixture {
        let store: Arc<dyn Persistence> = Arc::new(MemoryStore::new());
        let catalog = Arc::new(Catalog::load(Arc::clone(&store), true).await.unwrap());
        let customers = Arc::new(
            CustomerRegistry::load(Arc::clone(&store), DialingPlan::default())
                .await
                .unwrap(),
        );
        let ledger = OrderLedger::load(
            store,
            Arc::clone(&catalog),
            Arc::clone(&customers),
            WhatsAppConfig::default(),
            RetryPolicy::default(),
        )
        .await
        .unwrap();
        Fixture {
            catalog,
            customers,
            ledger,
        }
    }

    async fn new_order(catalog: &Catalog, id: &str, quantity: u32) -> NewOrder {
        let product = catalog.get(&ProductId::new(id)).await.unwrap();
        let line = CartLine::new(product, quantity);
        NewOrder {
            customer_name: "Ali".to_owned(),
            customer_phone: Phone::parse("03001234567").unwrap(),
            customer_address: "Test St".to_owned(),
            total_amount: line.subtotal(),
            items: vec![line],
        }
    }

    #[tokio::test]
    async fn test_create_order_newest_first_and_records_customer() {
        let f = fixture().await;
        let first = f.ledger.create_order(new_order(&f.catalog, "1", 1).await).await.unwrap();
        let second = f.ledger.create_order(new_order(&f.catalog, "2", 1).await).await.unwrap();

        assert_eq!(first.status, OrderStatus::Pending);
        let ids: Vec<_> = f.ledger.list().await.into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        let customers = f.customers.list().await;
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].total_orders, 2);
    }

    #[tokio::test]
    async fn test_create_order_validates() {
        let f = fixture().await;
        let mut blank = new_order(&f.catalog, "1", 1).await;
        blank.customer_name = " ".to_owned();
        assert!(matches!(
            f.ledger.create_order(blank).await,
            Err(StoreError::Validation(_))
        ));

        let mut empty = new_order(&f.catalog, "1", 1).await;
        empty.items.clear();
        assert!(matches!(
            f.ledger.create_order(empty).await,
            Err(StoreError::Validation(_))
        ));
        assert!(f.ledger.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_confirm_twice_decrements_once() {
        let f = fixture().await;
        let order = f.ledger.create_order(new_order(&f.catalog, "1", 4).await).await.unwrap();

        let change = f.ledger.set_status(&order.id, OrderStatus::Confirmed).await.unwrap();
        assert_eq!(change.previous, OrderStatus::Pending);
        assert!(change.adjusted_stock());

        let again = f.ledger.set_status(&order.id, OrderStatus::Confirmed).await.unwrap();
        assert!(!again.adjusted_stock());

        let rice = f.catalog.get(&ProductId::new("1")).await.unwrap();
        assert_eq!(rice.stock, 96);
    }

    #[tokio::test]
    async fn test_leaving_confirmed_never_restores_stock() {
        let f = fixture().await;
        let order = f.ledger.create_order(new_order(&f.catalog, "1", 4).await).await.unwrap();

        f.ledger.set_status(&order.id, OrderStatus::Confirmed).await.unwrap();
        f.ledger.set_status(&order.id, OrderStatus::Pending).await.unwrap();
        f.ledger.delete(&order.id).await.unwrap();

        assert_eq!(f.catalog.get(&ProductId::new("1")).await.unwrap().stock, 96);
        assert_eq!(f.customers.list().await[0].total_orders, 1);
    }

    #[tokio::test]
    async fn test_confirm_with_deleted_product_reports_failure() {
        let f = fixture().await;
        let order = f.ledger.create_order(new_order(&f.catalog, "1", 1).await).await.unwrap();
        f.catalog.delete(&ProductId::new("1")).await.unwrap();

        let change = f.ledger.set_status(&order.id, OrderStatus::Confirmed).await.unwrap();
        assert_eq!(change.order.status, OrderStatus::Confirmed);
        assert_eq!(change.failures.len(), 1);
        assert!(matches!(change.failures[0].error, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let f = fixture().await;
        let missing = OrderId::new("ORD-missing");
        assert!(matches!(
            f.ledger.set_status(&missing, OrderStatus::Delivered).await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            f.ledger.delete(&missing).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_by_status() {
        let f = fixture().await;
        let a = f.ledger.create_order(new_order(&f.catalog, "1", 1).await).await.unwrap();
        f.ledger.create_order(new_order(&f.catalog, "2", 1).await).await.unwrap();
        f.ledger.set_status(&a.id, OrderStatus::Delivered).await.unwrap();

        assert_eq!(f.ledger.list_by_status(None).await.len(), 2);
        let delivered = f.ledger.list_by_status(Some(OrderStatus::Delivered)).await;
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].id, a.id);
    }

    #[tokio::test]
    async fn test_replay_empty_outbox() {
        let f = fixture().await;
        assert_eq!(f.ledger.replay_customer_outbox().await.unwrap(), 0);
        assert!(f.ledger.pending_customer_updates().await.is_empty());
    }
}
