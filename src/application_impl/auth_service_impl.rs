use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::{SessionStore, UserRepo, UserUpdate};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use std::sync::Arc;

pub struct Argon2PasswordHasher;

#[async_trait::async_trait]
impl CredentialHasher for Argon2PasswordHasher {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::InternalError(format!("hash error: {e}")))?
            .to_string();
        Ok(hash)
    }

    async fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| AuthError::InternalError(format!("invalid PHC hash: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::InternalError(format!("verify error: {e}"))),
        }
    }
}

pub struct RealAuthService {
    user_repo: Arc<dyn UserRepo>,
    credential_hasher: Arc<dyn CredentialHasher>,
    token_maker: Arc<dyn TokenMaker>,
    session_store: Arc<dyn SessionStore>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl RealAuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        credential_hasher: Arc<dyn CredentialHasher>,
        token_maker: Arc<dyn TokenMaker>,
        session_store: Arc<dyn SessionStore>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            user_repo,
            credential_hasher,
            token_maker,
            session_store,
            access_ttl,
            refresh_ttl,
        }
    }

    fn verify_refresh(&self, refresh_token: &str) -> Result<Payload, AuthError> {
        self.token_maker
            .verify_token(refresh_token)
            .map_err(AuthError::InvalidRefreshToken)
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn create_user(&self, request: CreateUserInput) -> Result<UserView, AuthError> {
        let CreateUserInput {
            username,
            password,
            full_name,
            email,
        } = request;

        let hashed_password = self.credential_hasher.hash_password(&password).await?;
        let now = Utc::now();
        let user = User {
            username,
            hashed_password,
            full_name,
            email,
            password_changed_at: now,
            created_at: now,
        };

        self.user_repo.create_user(&user).await?;
        Ok(UserView::from(&user))
    }

    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError> {
        let LoginInput { username, password } = request;

        let user = self
            .user_repo
            .get_user(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let ok = self
            .credential_hasher
            .verify_password(&password, &user.hashed_password)
            .await?;
        if !ok {
            return Err(AuthError::InvalidCredentials);
        }

        let (access_token, access_payload) =
            self.token_maker.create_token(&user.username, self.access_ttl)?;
        let (refresh_token, refresh_payload) =
            self.token_maker.create_token(&user.username, self.refresh_ttl)?;

        let session = Session {
            id: refresh_payload.id,
            username: user.username.clone(),
            refresh_token: refresh_token.clone(),
            is_blocked: false,
            expires_at: refresh_payload.expired_at,
        };
        self.session_store.create_session(&session).await?;

        Ok(LoginResult {
            session_id: session.id,
            access_token,
            access_token_expires_at: access_payload.expired_at,
            refresh_token,
            refresh_token_expires_at: refresh_payload.expired_at,
            user: UserView::from(&user),
        })
    }

    async fn renew_access_token(&self, refresh_token: &str) -> Result<RenewResult, AuthError> {
        let payload = self.verify_refresh(refresh_token)?;

        let session = self
            .session_store
            .get_session(payload.id)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if session.is_blocked {
            return Err(AuthError::SessionBlocked);
        }
        if session.username != payload.username {
            return Err(AuthError::SessionMismatch);
        }
        if session.refresh_token != refresh_token {
            return Err(AuthError::SessionTokenMismatch);
        }
        if Utc::now() > session.expires_at {
            return Err(AuthError::SessionExpired);
        }

        let (access_token, access_payload) =
            self.token_maker.create_token(&payload.username, self.access_ttl)?;

        Ok(RenewResult {
            access_token,
            access_token_expires_at: access_payload.expired_at,
        })
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let payload = self.verify_refresh(refresh_token)?;
        self.session_store.set_blocked(payload.id).await
    }

    async fn update_user(
        &self,
        username: &str,
        request: UpdateUserInput,
    ) -> Result<UserView, AuthError> {
        let mut update = UserUpdate {
            full_name: request.full_name,
            email: request.email,
            ..UserUpdate::default()
        };
        if let Some(password) = request.password {
            update.hashed_password = Some(self.credential_hasher.hash_password(&password).await?);
            update.password_changed_at = Some(Utc::now());
        }

        let user = self.user_repo.update_user(username, &update).await?;
        Ok(UserView::from(&user))
    }
}
