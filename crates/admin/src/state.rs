//! Admin panel state.
//!
//! Every operation here checks the auth gate first and fails with
//! [`AdminError::Unauthorized`] when no admin is logged in.

use std::sync::Arc;

use tracing::{info, instrument};

use wholesale_core::{
    Customer, CustomerId, Order, OrderId, OrderStatus, Product, ProductDraft, ProductId,
    ProductImage,
};
use wholesale_storefront::services::StatusChange;
use wholesale_storefront::{StoreError, Storefront};

use crate::config::AdminConfig;
use crate::error::{AdminError, Result};
use crate::services::{AuthGate, DashboardMetrics, InvoiceRenderer, TextInvoiceRenderer};

/// Admin panel state shared across commands.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AdminState {
    inner: Arc<AdminStateInner>,
}

struct AdminStateInner {
    config: AdminConfig,
    storefront: Storefront,
    auth: AuthGate,
    invoices: Box<dyn InvoiceRenderer>,
}

impl AdminState {
    /// Create admin state with text invoices written to the configured
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Auth` if the auth gate cannot be restored.
    pub async fn new(storefront: Storefront, config: AdminConfig) -> Result<Self> {
        let renderer = TextInvoiceRenderer::new(config.invoice_dir.clone());
        Self::with_renderer(storefront, config, Box::new(renderer)).await
    }

    /// Create admin state with a custom invoice renderer.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Auth` if the auth gate cannot be restored.
    pub async fn with_renderer(
        storefront: Storefront,
        config: AdminConfig,
        invoices: Box<dyn InvoiceRenderer>,
    ) -> Result<Self> {
        let auth = AuthGate::restore(Arc::clone(storefront.persistence()), &config).await?;

        Ok(Self {
            inner: Arc::new(AdminStateInner {
                config,
                storefront,
                auth,
                invoices,
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// The storefront the admin manages.
    #[must_use]
    pub fn storefront(&self) -> &Storefront {
        &self.inner.storefront
    }

    /// The auth gate.
    #[must_use]
    pub fn auth(&self) -> &AuthGate {
        &self.inner.auth
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Log in.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Auth` for wrong credentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        Ok(self.inner.auth.login(username, password).await?)
    }

    /// Log out.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Auth` if the session record cannot be removed.
    pub async fn logout(&self) -> Result<()> {
        Ok(self.inner.auth.logout().await?)
    }

    /// Returns true if an admin is logged in.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.inner.auth.is_logged_in()
    }

    fn require_login(&self) -> Result<()> {
        if self.inner.auth.is_logged_in() {
            Ok(())
        } else {
            Err(AdminError::Unauthorized)
        }
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Add a product.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Unauthorized` or the catalog's error.
    pub async fn add_product(&self, draft: ProductDraft) -> Result<Product> {
        self.require_login()?;
        Ok(self.storefront().catalog().add(draft).await?)
    }

    /// Replace a product.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Unauthorized` or the catalog's error.
    pub async fn update_product(&self, product: Product) -> Result<Product> {
        self.require_login()?;
        Ok(self.storefront().catalog().update(product).await?)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Unauthorized` or the catalog's error.
    pub async fn delete_product(&self, id: &ProductId) -> Result<Product> {
        self.require_login()?;
        Ok(self.storefront().catalog().delete(id).await?)
    }

    /// Accept an uploaded product image.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Unauthorized`, or a validation error for a
    /// non-image or oversized upload.
    pub fn upload_image(&self, content_type: &str, bytes: &[u8]) -> Result<ProductImage> {
        self.require_login()?;
        ProductImage::from_upload(content_type, bytes)
            .map_err(|e| AdminError::Store(StoreError::from(e)))
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Orders with the given status, or all orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Unauthorized`.
    pub async fn orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>> {
        self.require_login()?;
        Ok(self.storefront().orders().list_by_status(status).await)
    }

    /// Look up one order.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Unauthorized`, or `AdminError::Store` for an
    /// unknown order.
    pub async fn order(&self, id: &OrderId) -> Result<Order> {
        self.require_login()?;
        Ok(self
            .storefront()
            .orders()
            .get(id)
            .await
            .ok_or_else(|| StoreError::not_found("Order", id))?)
    }

    /// Change an order's status.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Unauthorized` or the ledger's error.
    pub async fn set_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<StatusChange> {
        self.require_login()?;
        Ok(self.storefront().orders().set_status(id, status).await?)
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Unauthorized` or the ledger's error.
    pub async fn delete_order(&self, id: &OrderId) -> Result<Order> {
        self.require_login()?;
        Ok(self.storefront().orders().delete(id).await?)
    }

    /// Build the WhatsApp link for an order and mark it as sent.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Unauthorized` or the ledger's error.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn send_whatsapp(&self, id: &OrderId) -> Result<String> {
        let order = self.order(id).await?;
        let orders = self.storefront().orders();

        let link = orders.whatsapp_link(&order);
        orders.set_status(id, OrderStatus::WhatsappSent).await?;
        info!("WhatsApp link generated");
        Ok(link)
    }

    /// Render an order's invoice.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Unauthorized`, `AdminError::Store` for an
    /// unknown order, or `AdminError::Invoice`.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn invoice(&self, id: &OrderId) -> Result<Order> {
        let order = self.order(id).await?;
        self.inner.invoices.render(&order)?;
        Ok(order)
    }

    /// Retry deferred customer updates.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Unauthorized` or the ledger's error.
    pub async fn replay_customer_outbox(&self) -> Result<usize> {
        self.require_login()?;
        Ok(self.storefront().orders().replay_customer_outbox().await?)
    }

    /// Orders whose customer update is still queued.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Unauthorized`.
    pub async fn pending_customer_updates(&self) -> Result<Vec<OrderId>> {
        self.require_login()?;
        Ok(self.storefront().orders().pending_customer_updates().await)
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// All customers.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Unauthorized`.
    pub async fn customers(&self) -> Result<Vec<Customer>> {
        self.require_login()?;
        Ok(self.storefront().customers().list().await)
    }

    /// Select a customer to take a new order for.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Unauthorized`, or `AdminError::Store` for an
    /// unknown customer.
    pub async fn start_order_for(&self, id: &CustomerId) -> Result<Customer> {
        self.require_login()?;
        let customers = self.storefront().customers();
        let customer = customers
            .get(id)
            .await
            .ok_or_else(|| StoreError::not_found("Customer", id))?;
        customers.set_active(Some(customer.clone()));
        Ok(customer)
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Sales metrics.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Unauthorized`.
    pub async fn dashboard(&self) -> Result<DashboardMetrics> {
        self.require_login()?;
        let orders = self.storefront().orders().list().await;
        Ok(DashboardMetrics::compute(&orders))
    }
}

impl std::fmt::Debug for AdminState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminState")
            .field("config", &self.inner.config)
            .field("auth", &self.inner.auth)
            .finish_non_exhaustive()
    }
}
