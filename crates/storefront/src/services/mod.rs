//! Storefront stores and the operations built on them.
//!
//! # Services
//!
//! - `catalog` - Product catalog with stock adjustment
//! - `cart` - Shopper cart
//! - `customers` - Customer registry keyed by phone
//! - `orders` - Order ledger, confirmation stock step, customer saga
//! - `checkout` - Cart to order
//! - `whatsapp` - Click-to-chat message and link
//! - `publisher` - Snapshot fan-out used by every store

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod customers;
pub mod orders;
pub mod publisher;
pub mod whatsapp;

pub use cart::Cart;
pub use catalog::{Catalog, StockAdjustment};
pub use checkout::{Checkout, CheckoutForm};
pub use customers::CustomerRegistry;
pub use orders::{OrderLedger, StatusChange, StockFailure};
pub use publisher::{Publisher, Subscription};
