//! Customer registry.
//!
//! Customers are keyed by the international form of their phone number, so
//! `0300-1234567` and `+92 300 1234567` are the same person. Upserts run
//! behind the registry mutex and are idempotent per order ID.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use wholesale_core::{Customer, CustomerId, DialingPlan, Order, Phone};

use crate::db::{self, Persistence, keys};
use crate::error::Result;
use crate::services::publisher::{Publisher, Subscription};

/// Every customer who has placed an order.
#[derive(Debug)]
pub struct CustomerRegistry {
    persistence: Arc<dyn Persistence>,
    dialing: DialingPlan,
    customers: Mutex<Vec<Customer>>,
    publisher: Publisher<Customer>,
    active: RwLock<Option<Customer>>,
}

impl CustomerRegistry {
    /// Load the persisted customers.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the record cannot be read.
    pub async fn load(persistence: Arc<dyn Persistence>, dialing: DialingPlan) -> Result<Self> {
        let customers = db::load(persistence.as_ref(), keys::CUSTOMERS)
            .await?
            .unwrap_or_default();

        Ok(Self {
            persistence,
            dialing,
            customers: Mutex::new(customers),
            publisher: Publisher::new(),
            active: RwLock::new(None),
        })
    }

    /// Register a listener for customer snapshots.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[Customer]) + Send + Sync + 'static,
    {
        self.publisher.subscribe(listener)
    }

    /// Fold an order into its customer's record, creating the customer on
    /// their first order. Recording the same order twice changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the registry cannot be saved.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn record_order(&self, order: &Order) -> Result<Customer> {
        let key = self.dialing.normalize(&order.customer_phone);
        let mut customers = self.customers.lock().await;

        let mut next = customers.clone();
        let existing = next
            .iter_mut()
            .find(|c| self.dialing.normalize(&c.phone) == key);

        let customer = match existing {
            Some(customer) if customer.has_order(&order.id) => {
                debug!(customer_id = %customer.id, "Order already recorded");
                return Ok(customer.clone());
            }
            Some(customer) => {
                customer.apply_order(order, order.order_date);
                customer.clone()
            }
            None => {
                let customer = Customer::from_order(order, order.order_date);
                next.push(customer.clone());
                customer
            }
        };

        db::save(self.persistence.as_ref(), keys::CUSTOMERS, &next).await?;
        *customers = next;
        self.publisher.publish(&customers);

        info!(
            customer_id = %customer.id,
            phone = %key,
            total_orders = customer.total_orders,
            "Customer updated"
        );
        Ok(customer)
    }

    /// All customers, in first-order sequence.
    pub async fn list(&self) -> Vec<Customer> {
        self.customers.lock().await.clone()
    }

    /// Look up a customer by ID.
    pub async fn get(&self, id: &CustomerId) -> Option<Customer> {
        self.customers
            .lock()
            .await
            .iter()
            .find(|c| &c.id == id)
            .cloned()
    }

    /// Look up a customer by phone, in any local or international format.
    pub async fn find_by_phone(&self, phone: &Phone) -> Option<Customer> {
        let key = self.dialing.normalize(phone);
        self.customers
            .lock()
            .await
            .iter()
            .find(|c| self.dialing.normalize(&c.phone) == key)
            .cloned()
    }

    /// Select the customer a new order is being taken for.
    pub fn set_active(&self, customer: Option<Customer>) {
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = customer;
    }

    /// The customer selected with [`Self::set_active`], if any.
    pub fn active(&self) -> Option<Customer> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
