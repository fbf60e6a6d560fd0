use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-side record backing one issued refresh token, keyed by the
/// token payload's id. Created once at issuance, read on every renewal,
/// mutated only to flip `is_blocked` on revocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub username: String,
    pub refresh_token: String,
    pub is_blocked: bool,
    pub expires_at: DateTime<Utc>,
}
