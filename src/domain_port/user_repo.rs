use crate::application_port::*;
use crate::domain_model::*;
use chrono::{DateTime, Utc};

/// Partial update for a user row. `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub hashed_password: Option<String>,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<(), AuthError>;

    async fn get_user(&self, username: &str) -> Result<Option<User>, AuthError>;

    async fn update_user(&self, username: &str, update: &UserUpdate) -> Result<User, AuthError>;
}
