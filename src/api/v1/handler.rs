use super::error::*;
use crate::application_port::*;
use crate::domain_model::{Currency, Payload};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

const MIN_PASSWORD_LEN: usize = 6;
const MIN_PAGE_SIZE: i64 = 5;
const MAX_PAGE_SIZE: i64 = 10;

fn validate_username(username: &str) -> Result<(), warp::Rejection> {
    if username.is_empty() || !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(reject::custom(ApiErrorCode::InvalidRequest));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), warp::Rejection> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(reject::custom(ApiErrorCode::InvalidRequest));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), warp::Rejection> {
    if !email.contains('@') {
        return Err(reject::custom(ApiErrorCode::InvalidRequest));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
}

pub async fn create_user(
    body: CreateUserRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    validate_username(&body.username)?;
    validate_password(&body.password)?;
    validate_email(&body.email)?;

    let user = auth_service
        .create_user(CreateUserInput {
            username: body.username,
            password: body.password,
            full_name: body.full_name,
            email: body.email,
        })
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(user)))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(
    body: LoginRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let login_result = auth_service
        .login(LoginInput {
            username: body.username,
            password: body.password,
        })
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(login_result)))
}

#[derive(Debug, Deserialize)]
pub struct RenewAccessTokenRequest {
    pub refresh_token: String,
}

pub async fn renew_access_token(
    body: RenewAccessTokenRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let renewed = auth_service
        .renew_access_token(&body.refresh_token)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(renewed)))
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse;

pub async fn logout(
    body: LogoutRequest,
    _payload: Payload,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    auth_service
        .logout(&body.refresh_token)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(LogoutResponse)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

pub async fn update_user(
    body: UpdateUserRequest,
    payload: Payload,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if let Some(password) = &body.password {
        validate_password(password)?;
    }
    if let Some(email) = &body.email {
        validate_email(email)?;
    }

    // Callers can only ever update the user the token names.
    let user = auth_service
        .update_user(
            &payload.username,
            UpdateUserInput {
                password: body.password,
                full_name: body.full_name,
                email: body.email,
            },
        )
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(user)))
}

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub currency: Currency,
}

pub async fn create_account(
    body: CreateAccountRequest,
    payload: Payload,
    account_service: Arc<dyn AccountService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let account = account_service
        .create_account(&payload.username, body.currency)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(account)))
}

pub async fn get_account(
    id: i64,
    payload: Payload,
    account_service: Arc<dyn AccountService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let account = account_service
        .get_account(&payload.username, id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(account)))
}

#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    pub page_id: i64,
    pub page_size: i64,
}

pub async fn list_accounts(
    query: ListAccountsQuery,
    payload: Payload,
    account_service: Arc<dyn AccountService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if query.page_id < 1 || !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&query.page_size) {
        return Err(reject::custom(ApiErrorCode::InvalidRequest));
    }

    let accounts = account_service
        .list_accounts(&payload.username, query.page_id, query.page_size)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(accounts)))
}

#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse;

pub async fn delete_account(
    id: i64,
    payload: Payload,
    account_service: Arc<dyn AccountService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    account_service
        .delete_account(&payload.username, id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(DeleteAccountResponse)))
}

#[derive(Debug, Deserialize)]
pub struct CreateTransferRequest {
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: i64,
    pub currency: Currency,
}

pub async fn create_transfer(
    body: CreateTransferRequest,
    payload: Payload,
    account_service: Arc<dyn AccountService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if body.amount <= 0 {
        return Err(reject::custom(ApiErrorCode::InvalidRequest));
    }

    let result = account_service
        .create_transfer(
            &payload.username,
            CreateTransferInput {
                from_account_id: body.from_account_id,
                to_account_id: body.to_account_id,
                amount: body.amount,
                currency: body.currency,
            },
        )
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(result)))
}
