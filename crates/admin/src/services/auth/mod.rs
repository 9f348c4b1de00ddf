//! Admin auth gate.
//!
//! One configured credential pair. The password is held only as an Argon2
//! hash. A successful login persists `{loggedIn, timestamp}` under
//! `admin_auth`; on startup the record is read back and cleared if older
//! than the session TTL.

mod error;

pub use error::AuthError;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Duration, Utc};
use secrecy::ExposeSecret;
use tracing::{info, instrument, warn};

use wholesale_core::AdminSession;
use wholesale_storefront::db::{self, Persistence, keys};

use crate::config::AdminConfig;

/// Gate in front of every admin operation.
pub struct AuthGate {
    persistence: Arc<dyn Persistence>,
    username: String,
    password_hash: String,
    session_ttl: Duration,
    logged_in: AtomicBool,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("session_ttl", &self.session_ttl)
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}

impl AuthGate {
    /// Build the gate and restore any persisted session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if the configured password cannot
    /// be hashed, or `AuthError::Persistence` if the session record cannot
    /// be read or cleared.
    pub async fn restore(
        persistence: Arc<dyn Persistence>,
        config: &AdminConfig,
    ) -> Result<Self, AuthError> {
        Self::restore_at(persistence, config, Utc::now()).await
    }

    /// [`Self::restore`] with an explicit clock.
    ///
    /// # Errors
    ///
    /// See [`Self::restore`].
    pub async fn restore_at(
        persistence: Arc<dyn Persistence>,
        config: &AdminConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        let gate = Self {
            persistence,
            username: config.username.clone(),
            password_hash: hash_password(config.password.expose_secret())?,
            session_ttl: config.session_ttl,
            logged_in: AtomicBool::new(false),
        };

        let session = match db::load::<AdminSession>(gate.persistence.as_ref(), keys::ADMIN_AUTH).await {
            Ok(session) => session,
            Err(db::PersistenceError::Serialization(e)) => {
                warn!(error = %e, "Unreadable admin session, discarding");
                gate.logout().await?;
                None
            }
            Err(e) => return Err(e.into()),
        };

        match session {
            Some(session) if session.is_valid_at(now, gate.session_ttl) => {
                gate.logged_in.store(true, Ordering::SeqCst);
            }
            Some(session) if session.logged_in => {
                info!(started = %session.timestamp, "Admin session expired");
                gate.logout().await?;
            }
            _ => {}
        }

        Ok(gate)
    }

    /// Check the credentials and start a session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on a mismatch, or
    /// `AuthError::Persistence` if the session cannot be saved.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        self.login_at(username, password, Utc::now()).await
    }

    /// [`Self::login`] with an explicit clock.
    ///
    /// # Errors
    ///
    /// See [`Self::login`].
    #[instrument(skip(self, password, now))]
    pub async fn login_at(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let password_ok = verify_password(password, &self.password_hash).is_ok();
        if !password_ok || username != self.username {
            warn!("Admin login failed");
            return Err(AuthError::InvalidCredentials);
        }

        db::save(
            self.persistence.as_ref(),
            keys::ADMIN_AUTH,
            &AdminSession::started(now),
        )
        .await?;
        self.logged_in.store(true, Ordering::SeqCst);

        info!("Admin logged in");
        Ok(())
    }

    /// End the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Persistence` if the record cannot be removed.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.logged_in.store(false, Ordering::SeqCst);
        self.persistence.remove(keys::ADMIN_AUTH).await?;
        Ok(())
    }

    /// The in-memory login flag.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }

    /// How long a session lasts.
    #[must_use]
    pub const fn session_ttl(&self) -> Duration {
        self.session_ttl
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wholesale_storefront::db::MemoryStore;

    fn store() -> Arc<dyn Persistence> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("admin123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("admin123", &hash).is_ok());
        assert!(verify_password("admin1234", &hash).is_err());
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let persistence = store();
        let config = AdminConfig::default();
        let gate = AuthGate::restore(Arc::clone(&persistence), &config).await.unwrap();
        assert!(!gate.is_logged_in());

        gate.login("admin", "admin123").await.unwrap();
        assert!(gate.is_logged_in());

        let restored = AuthGate::restore(persistence, &config).await.unwrap();
        assert!(restored.is_logged_in());
    }

    #[tokio::test]
    async fn test_wrong_credentials() {
        let gate = AuthGate::restore(store(), &AdminConfig::default()).await.unwrap();
        assert!(matches!(
            gate.login("admin", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            gate.login("root", "admin123").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(!gate.is_logged_in());
    }

    #[tokio::test]
    async fn test_expired_session_is_cleared() {
        let persistence = store();
        let config = AdminConfig::default();
        let start = Utc::now() - Duration::hours(25);

        let gate = AuthGate::restore_at(Arc::clone(&persistence), &config, start)
            .await
            .unwrap();
        gate.login_at("admin", "admin123", start).await.unwrap();

        let restored = AuthGate::restore(Arc::clone(&persistence), &config).await.unwrap();
        assert!(!restored.is_logged_in());
        assert!(persistence.get(keys::ADMIN_AUTH).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_record() {
        let persistence = store();
        let gate = AuthGate::restore(Arc::clone(&persistence), &AdminConfig::default())
            .await
            .unwrap();
        gate.login("admin", "admin123").await.unwrap();
        gate.logout().await.unwrap();

        assert!(!gate.is_logged_in());
        assert!(persistence.get(keys::ADMIN_AUTH).await.unwrap().is_none());
    }
}
