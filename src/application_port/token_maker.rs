use crate::domain_model::{Payload, TokenError};
use chrono::Duration;

/// Mints and verifies bearer tokens. Implementations differ only in the
/// sealing scheme; the claims carried are always a [`Payload`].
pub trait TokenMaker: Send + Sync {
    /// Create a token for `username` valid for `duration`, returning the
    /// sealed string together with the payload embedded in it.
    fn create_token(
        &self,
        username: &str,
        duration: Duration,
    ) -> Result<(String, Payload), TokenError>;

    /// Check the token's integrity and expiry, returning the claims on
    /// success. Integrity failures surface before expiry failures.
    fn verify_token(&self, token: &str) -> Result<Payload, TokenError>;
}
