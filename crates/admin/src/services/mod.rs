//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Credential check and persisted 24 hour session
//! - `dashboard` - Revenue, profit and best sellers
//! - `invoice` - Printable invoices for orders

pub mod auth;
pub mod dashboard;
pub mod invoice;

pub use auth::{AuthError, AuthGate};
pub use dashboard::{DashboardMetrics, TopProduct};
pub use invoice::{InvoiceError, InvoiceRenderer, TextInvoiceRenderer};
