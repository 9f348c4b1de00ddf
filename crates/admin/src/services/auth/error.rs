//! Admin authentication error types.

use thiserror::Error;

use wholesale_storefront::db::PersistenceError;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password did not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The configured password could not be hashed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Session record could not be read or written.
    #[error("session storage error: {0}")]
    Persistence(#[from] PersistenceError),
}
