use chrono::{DateTime, Utc};
use serde::Serialize;

/// Stored user row. `username` is the primary key and the subject identity
/// embedded in issued tokens.
#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub hashed_password: String,
    pub full_name: String,
    pub email: String,
    pub password_changed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Client-facing view of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password_changed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        UserView {
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            password_changed_at: user.password_changed_at,
            created_at: user.created_at,
        }
    }
}
