//! Admin error type.

use thiserror::Error;

use wholesale_storefront::StoreError;

use crate::services::auth::AuthError;
use crate::services::invoice::InvoiceError;

/// Errors returned by admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// No admin session is active.
    #[error("Unauthorized: admin login required")]
    Unauthorized,

    /// Login or session storage failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// A store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The invoice could not be rendered.
    #[error("Invoice error: {0}")]
    Invoice(#[from] InvoiceError),
}

impl AdminError {
    /// Message safe to show to the admin.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => "Please log in to continue.".to_string(),
            Self::Auth(AuthError::InvalidCredentials) => {
                "Invalid username or password".to_string()
            }
            Self::Auth(_) => "Authentication error".to_string(),
            Self::Store(err) => err.user_message(),
            Self::Invoice(_) => "Could not generate the invoice.".to_string(),
        }
    }
}

/// Result type alias for `AdminError`.
pub type Result<T> = std::result::Result<T, AdminError>;
