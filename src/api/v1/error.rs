use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::body::BodyDeserializeError;
use warp::http::StatusCode;
use warp::{reject, Rejection};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    if let Some(err) = err.find::<ApiErrorCode>() {
        let json = warp::reply::json(&ApiResponse::<()>::err(err.clone(), err.to_string()));
        Ok(warp::reply::with_status(json, err.status()))
    } else if let Some(err) = err.find::<BodyDeserializeError>() {
        let json = warp::reply::json(&ApiResponse::<()>::err(
            ApiErrorCode::InvalidRequest,
            err.to_string(),
        ));
        Ok(warp::reply::with_status(json, StatusCode::BAD_REQUEST))
    } else if err.is_not_found() {
        let json = warp::reply::json(&ApiResponse::<()>::err(
            ApiErrorCode::NotFound,
            "no such route",
        ));
        Ok(warp::reply::with_status(json, StatusCode::NOT_FOUND))
    } else {
        let json = warp::reply::json(&ApiResponse::<()>::err(
            ApiErrorCode::InternalError,
            format!("Unhandled error: {:?}", err),
        ));
        Ok(warp::reply::with_status(
            json,
            StatusCode::INTERNAL_SERVER_ERROR,
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Account already exists for this owner and currency")]
    AccountTaken,
    #[error("Accounts must share the request currency")]
    CurrencyMismatch,
    #[error("Insufficient balance")]
    InsufficientBalance,
    #[error("Invalid request")]
    InvalidRequest,
    #[error("Not found")]
    NotFound,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::Unauthorized | ApiErrorCode::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ApiErrorCode::UsernameTaken
            | ApiErrorCode::AccountTaken
            | ApiErrorCode::CurrencyMismatch
            | ApiErrorCode::InsufficientBalance
            | ApiErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<AuthError> for ApiErrorCode {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials => ApiErrorCode::InvalidCredentials,
            AuthError::UserExists => ApiErrorCode::UsernameTaken,
            AuthError::UserNotFound => ApiErrorCode::NotFound,
            AuthError::Store(e) | AuthError::InternalError(e) => ApiErrorCode::internal(e),
            // Header, token and session failures all present the same way;
            // the distinguishing variant only reaches the log.
            other => {
                warn!(cause = %other, "authentication rejected");
                ApiErrorCode::Unauthorized
            }
        }
    }
}

impl From<AccountError> for ApiErrorCode {
    fn from(error: AccountError) -> Self {
        match error {
            AccountError::AccountNotFound | AccountError::OwnerNotFound => ApiErrorCode::NotFound,
            AccountError::AccountExists => ApiErrorCode::AccountTaken,
            AccountError::NotOwner => {
                warn!(cause = %AccountError::NotOwner, "ownership rejected");
                ApiErrorCode::Unauthorized
            }
            AccountError::CurrencyMismatch { .. } => ApiErrorCode::CurrencyMismatch,
            AccountError::InsufficientBalance { .. } => ApiErrorCode::InsufficientBalance,
            AccountError::Store(e) | AccountError::InternalError(e) => ApiErrorCode::internal(e),
        }
    }
}
