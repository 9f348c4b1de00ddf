//! Admin session record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Persisted admin login state.
///
/// Stored as `{"loggedIn": true, "timestamp": <epoch millis>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub logged_in: bool,
    /// When the session began.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl AdminSession {
    /// A session starting at `now`.
    #[must_use]
    pub const fn started(now: DateTime<Utc>) -> Self {
        Self {
            logged_in: true,
            timestamp: now,
        }
    }

    /// Returns true if the session is logged in and younger than `ttl`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.logged_in && now - self.timestamp < ttl
    }
}
