use crate::domain_model::{TokenError, UserView};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("authorization header is missing")]
    MissingAuthorization,
    #[error("authorization header is malformed")]
    MalformedAuthorization,
    #[error("unsupported authorization type")]
    UnsupportedAuthorizationType,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("invalid refresh token: {0}")]
    InvalidRefreshToken(TokenError),
    #[error("session not found")]
    SessionNotFound,
    #[error("session blocked")]
    SessionBlocked,
    #[error("session belongs to another user")]
    SessionMismatch,
    #[error("refresh token does not match session")]
    SessionTokenMismatch,
    #[error("session expired")]
    SessionExpired,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user already exists")]
    UserExists,
    #[error("user not found")]
    UserNotFound,
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub session_id: Uuid,
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
    pub user: UserView,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenewResult {
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
}

/// Partial user update. `None` fields are left untouched; a new password
/// also refreshes `password_changed_at`.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError>;
    async fn verify_password(&self, password: &str, password_hash: &str)
    -> Result<bool, AuthError>;
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    async fn create_user(&self, request: CreateUserInput) -> Result<UserView, AuthError>;
    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError>;
    /// Mint a new access token off a still-valid refresh token. The refresh
    /// token itself is reused unchanged until it expires or is blocked.
    async fn renew_access_token(&self, refresh_token: &str) -> Result<RenewResult, AuthError>;
    /// Revoke the session backing `refresh_token` by blocking it.
    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError>;
    async fn update_user(
        &self,
        username: &str,
        request: UpdateUserInput,
    ) -> Result<UserView, AuthError>;
}
