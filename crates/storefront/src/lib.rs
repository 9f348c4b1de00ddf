//! Wholesale storefront library.
//!
//! Stores for the product catalog, shopper cart, customers and orders,
//! over a swappable persistence backend. [`state::Storefront`] wires them
//! together; the admin and CLI crates drive them.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod state;

pub use config::StorefrontConfig;
pub use error::{Result, StoreError};
pub use state::Storefront;
