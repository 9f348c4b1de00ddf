//! Store-level error type.
//!
//! Every store operation returns `Result<T, StoreError>`. Callers nearest the
//! user action turn failures into a message with [`StoreError::user_message`]
//! instead of letting them end the session.

use thiserror::Error;

use wholesale_core::{ImageError, PhoneError, ProductId};

use crate::db::PersistenceError;

/// Errors raised by the catalog, cart, customer and order stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input failed validation (missing checkout fields, bad quantity, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The backend could not read or write a record.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// The product, order or customer no longer exists.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// An order line needs more units than the catalog holds.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// A cart quantity would exceed the product's stock.
    #[error("Quantity {requested} exceeds stock {available} for product {product_id}")]
    QuantityExceedsStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// Customer phone number is unusable.
    #[error("Invalid phone number: {0}")]
    Phone(#[from] PhoneError),

    /// Uploaded image was rejected.
    #[error("Invalid image: {0}")]
    Image(#[from] ImageError),
}

impl StoreError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns true for errors caused by user input rather than the backend.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::EmptyCart
                | Self::Phone(_)
                | Self::Image(_)
                | Self::QuantityExceedsStock { .. }
                | Self::InsufficientStock { .. }
        )
    }

    /// Message safe to show to the shopper or admin.
    ///
    /// Backend failures are reported generically; their details stay in logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Persistence(_) => "Could not save your changes. Please try again.".to_string(),
            Self::EmptyCart => "Your cart is empty.".to_string(),
            Self::Validation(msg) => msg.clone(),
            Self::NotFound { entity, .. } => format!("That {} no longer exists.", entity.to_lowercase()),
            Self::InsufficientStock { available, .. }
            | Self::QuantityExceedsStock { available, .. } => {
                format!("Only {available} units available in stock.")
            }
            Self::Phone(_) => "Please enter a valid phone number.".to_string(),
            Self::Image(err) => match err {
                ImageError::NotAnImage(_) => "Please upload an image file.".to_string(),
                ImageError::TooLarge { .. } => {
                    "Image is too large. Please use a smaller image.".to_string()
                }
            },
        }
    }
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;
