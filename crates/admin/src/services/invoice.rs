//! Invoice rendering.
//!
//! The admin panel hands a whole [`Order`] to an [`InvoiceRenderer`] and does
//! not use anything it returns beyond success or failure.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use wholesale_core::Order;

/// Errors raised while rendering an invoice.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// The document could not be written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Produces a printable document for an order.
pub trait InvoiceRenderer: Send + Sync {
    /// Render the invoice for `order`.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError` if the document cannot be produced.
    fn render(&self, order: &Order) -> Result<(), InvoiceError>;
}

/// Writes plain-text invoices as `invoice-{order id}.txt`.
#[derive(Debug, Clone)]
pub struct TextInvoiceRenderer {
    dir: PathBuf,
}

impl TextInvoiceRenderer {
    /// Render into `dir`, created on first use.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where the invoice for `order` is written.
    #[must_use]
    pub fn path_for(&self, order: &Order) -> PathBuf {
        self.dir.join(format!("invoice-{}.txt", order.id))
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl InvoiceRenderer for TextInvoiceRenderer {
    fn render(&self, order: &Order) -> Result<(), InvoiceError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(order);
        std::fs::write(&path, render_text(order))?;
        info!(order_id = %order.id, path = %path.display(), "Invoice written");
        Ok(())
    }
}

const WIDTH: usize = 64;

/// The invoice document as text.
#[must_use]
pub fn render_text(order: &Order) -> String {
    let rule = "-".repeat(WIDTH);
    let mut lines = Vec::new();

    let header_right = [
        "INVOICE".to_string(),
        format!("Invoice #: {}", order.id),
        format!("Date: {}", order.order_date.format("%d/%m/%Y")),
        format!("Status: {}", order.status.as_str().to_uppercase()),
    ];
    let header_left = [
        "WHOLESALE INVENTORY",
        "123 Warehouse St, Business District",
        "City, Country 12345",
        "Phone: +92 300 1234567",
    ];
    for (left, right) in header_left.iter().zip(header_right.iter()) {
        let pad = WIDTH.saturating_sub(left.chars().count());
        lines.push(format!("{left}{right:>pad$}"));
    }

    lines.push("\nBill To:".to_owned());
    lines.push(order.customer_name.clone());
    lines.push(order.customer_phone.to_string());
    lines.push(format!("{}\n", order.customer_address));

    lines.push(format!(
        "{:<4}{:<26}{:>6}{:>14}{:>14}",
        "#", "Item", "Qty", "Unit Price", "Total"
    ));
    lines.push(rule.clone());
    for (index, line) in order.items.iter().enumerate() {
        lines.push(format!(
            "{:<4}{:<26}{:>6}{:>14}{:>14}",
            index + 1,
            line.product.name,
            line.quantity,
            line.product.price.grouped(),
            line.subtotal().grouped()
        ));
    }
    lines.push(rule);

    let total = format!("Total Amount: {}", order.total_amount.grouped());
    lines.push(format!("{total:>WIDTH$}\n"));
    lines.push(format!("{:^WIDTH$}", "Thank you for your business!"));

    let mut doc = lines.join("\n");
    doc.push('\n');
    doc
}
