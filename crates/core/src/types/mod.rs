//! Core types for the wholesale storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod image;
pub mod phone;
pub mod price;
pub mod status;

pub use id::*;
pub use image::{ImageError, ImageKind, ProductImage};
pub use phone::{DialingPlan, Phone, PhoneError};
pub use price::Price;
pub use status::*;
