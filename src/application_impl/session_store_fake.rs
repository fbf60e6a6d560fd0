use crate::application_port::AuthError;
use crate::domain_model::Session;
use crate::domain_port::SessionStore;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory session store. Holds whatever was written, including sessions
/// past their `expires_at`, so callers exercise their own expiry checks.
#[derive(Debug, Default)]
pub struct FakeSessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl FakeSessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SessionStore for FakeSessionStore {
    async fn create_session(&self, session: &Session) -> Result<(), AuthError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| AuthError::Store("session store lock poisoned".to_string()))?;
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn get_session(&self, id: Uuid) -> Result<Option<Session>, AuthError> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|_| AuthError::Store("session store lock poisoned".to_string()))?;
        Ok(sessions.get(&id).cloned())
    }

    async fn set_blocked(&self, id: Uuid) -> Result<(), AuthError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| AuthError::Store("session store lock poisoned".to_string()))?;
        if let Some(session) = sessions.get_mut(&id) {
            session.is_blocked = true;
        }
        Ok(())
    }
}
