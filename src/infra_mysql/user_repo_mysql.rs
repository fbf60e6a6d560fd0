use super::util::is_dup_key;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

pub struct MySqlUserRepo {
    pool: MySqlPool,
}

impl MySqlUserRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserRepo { pool }
    }

    fn row_to_user(row: MySqlRow) -> Result<User, AuthError> {
        let username: String = row
            .try_get("username")
            .map_err(|e| AuthError::Store(e.to_string()))?;
        let hashed_password: String = row
            .try_get("hashed_password")
            .map_err(|e| AuthError::Store(e.to_string()))?;
        let full_name: String = row
            .try_get("full_name")
            .map_err(|e| AuthError::Store(e.to_string()))?;
        let email: String = row
            .try_get("email")
            .map_err(|e| AuthError::Store(e.to_string()))?;
        let password_changed_at: DateTime<Utc> = row
            .try_get("password_changed_at")
            .map_err(|e| AuthError::Store(e.to_string()))?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(User {
            username,
            hashed_password,
            full_name,
            email,
            password_changed_at,
            created_at,
        })
    }
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn create_user(&self, user: &User) -> Result<(), AuthError> {
        sqlx::query(
            r#"
INSERT INTO user (username, hashed_password, full_name, email, password_changed_at, created_at)
VALUES (?, ?, ?, ?, ?, ?)
"#,
        )
        .bind(&user.username)
        .bind(&user.hashed_password)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(user.password_changed_at)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_dup_key(&e) {
                AuthError::UserExists
            } else {
                AuthError::Store(e.to_string())
            }
        })?;

        Ok(())
    }

    async fn get_user(&self, username: &str) -> Result<Option<User>, AuthError> {
        let row_opt: Option<MySqlRow> = sqlx::query(
            r#"
SELECT username, hashed_password, full_name, email, password_changed_at, created_at
FROM user
WHERE username = ?
"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        row_opt.map(Self::row_to_user).transpose()
    }

    async fn update_user(&self, username: &str, update: &UserUpdate) -> Result<User, AuthError> {
        sqlx::query(
            r#"
UPDATE user
SET hashed_password = COALESCE(?, hashed_password),
    password_changed_at = COALESCE(?, password_changed_at),
    full_name = COALESCE(?, full_name),
    email = COALESCE(?, email)
WHERE username = ?
"#,
        )
        .bind(&update.hashed_password)
        .bind(update.password_changed_at)
        .bind(&update.full_name)
        .bind(&update.email)
        .bind(username)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_dup_key(&e) {
                AuthError::UserExists
            } else {
                AuthError::Store(e.to_string())
            }
        })?;

        self.get_user(username).await?.ok_or(AuthError::UserNotFound)
    }
}
