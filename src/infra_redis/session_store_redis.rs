use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use uuid::Uuid;

/// Sessions live under `{prefix}:{id}` as JSON, with the redis TTL bound to
/// the session's own `expires_at` so revocation records age out on their own.
pub struct RedisSessionStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisSessionStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        RedisSessionStore {
            conn,
            prefix: prefix.into(),
        }
    }

    fn key(&self, id: Uuid) -> String {
        format!("{}:{}", self.prefix, id)
    }

    fn ttl_secs(session: &Session) -> u64 {
        let secs = (session.expires_at - Utc::now()).num_seconds();
        if secs <= 0 { 1 } else { secs as u64 }
    }

    async fn put(&self, session: &Session) -> Result<(), AuthError> {
        let json =
            serde_json::to_string(session).map_err(|e| AuthError::Store(e.to_string()))?;
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(self.key(session.id), json, Self::ttl_secs(session))
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn create_session(&self, session: &Session) -> Result<(), AuthError> {
        self.put(session).await
    }

    async fn get_session(&self, id: Uuid) -> Result<Option<Session>, AuthError> {
        let mut conn = self.conn.clone();
        let val: Option<String> = conn
            .get(self.key(id))
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        val.map(|json| serde_json::from_str(&json).map_err(|e| AuthError::Store(e.to_string())))
            .transpose()
    }

    async fn set_blocked(&self, id: Uuid) -> Result<(), AuthError> {
        match self.get_session(id).await? {
            Some(mut session) => {
                session.is_blocked = true;
                self.put(&session).await
            }
            // Already expired out of the store, nothing left to revoke.
            None => Ok(()),
        }
    }
}
