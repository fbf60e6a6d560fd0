use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Decoded, verified identity claim carried by every issued token.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub id: Uuid,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
}

impl Payload {
    /// Mints a fresh payload with a random id. The clock is read once so
    /// `issued_at` and `expired_at` share the same base instant; both are
    /// truncated to whole seconds, the resolution of the wire claims.
    pub fn new(username: impl Into<String>, duration: Duration) -> Result<Self, TokenError> {
        let username = username.into();
        if username.is_empty() {
            return Err(TokenError::InvalidUsername);
        }

        let now = Utc::now().trunc_subsecs(0);
        Ok(Payload {
            id: Uuid::new_v4(),
            username,
            issued_at: now,
            expired_at: now + duration,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expired_at
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid key size: at least {0} bytes required")]
    WeakKey(usize),
    #[error("username must not be empty")]
    InvalidUsername,
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    SignatureInvalid,
    #[error("token cannot be decrypted")]
    Decryption,
    #[error("token has expired")]
    Expired,
    #[error("internal token error: {0}")]
    Internal(String),
}
