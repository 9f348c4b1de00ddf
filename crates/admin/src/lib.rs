//! Wholesale admin library.
//!
//! The admin panel's logic without a UI: a password gate with a 24 hour
//! session, catalog and order management behind it, sales metrics, and
//! invoice rendering.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod services;
pub mod state;

pub use config::AdminConfig;
pub use error::AdminError;
pub use state::AdminState;
