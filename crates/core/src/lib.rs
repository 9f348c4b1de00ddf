//! Wholesale Core - Shared types library.
//!
//! This crate provides common types used across all wholesale components:
//! - `storefront` - Catalog, cart, customer registry and order ledger stores
//! - `admin` - Admin gate, dashboard and invoicing on top of the stores
//! - `cli` - Command-line driver for every store operation
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no persistence,
//! no clocks beyond record constructors. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, phones, images and statuses
//! - [`models`] - The persisted records: products, cart lines, orders, customers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
