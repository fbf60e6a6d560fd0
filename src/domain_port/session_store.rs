use crate::application_port::*;
use crate::domain_model::*;
use uuid::Uuid;

#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a freshly issued session, keyed by the refresh token's id.
    async fn create_session(&self, session: &Session) -> Result<(), AuthError>;
    /// Fetch a session by id. `None` when the key is absent or expired.
    async fn get_session(&self, id: Uuid) -> Result<Option<Session>, AuthError>;
    /// Flip `is_blocked` on. No-op when the session no longer exists.
    async fn set_blocked(&self, id: Uuid) -> Result<(), AuthError>;
}
