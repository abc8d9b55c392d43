use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::ValidationError;
use crate::storage::StorageError;
use crate::store::{AuthError, StoreError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account already exists")]
    AccountExists,

    #[error("Stored data under '{0}' is unreadable")]
    StorageCorrupt(String),

    #[error("No free resume id left in '{0}'")]
    IdsExhausted(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Storage(e) => AppError::Storage(e),
            StoreError::Corrupt { key } => AppError::StorageCorrupt(key),
            StoreError::IdsExhausted { key } => AppError::IdsExhausted(key),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(v) => AppError::Validation(v),
            AuthError::AccountExists => AppError::AccountExists,
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            AuthError::Store(s) => s.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Please sign in first".to_string(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid email or password".to_string(),
            ),
            AppError::AccountExists => (
                StatusCode::CONFLICT,
                "ACCOUNT_EXISTS",
                "Account already exists. Please sign in.".to_string(),
            ),
            AppError::StorageCorrupt(key) => {
                tracing::warn!("Refusing to use unreadable storage at {key}");
                (
                    StatusCode::CONFLICT,
                    "STORAGE_CORRUPT",
                    format!("Saved data at '{key}' could not be read"),
                )
            }
            AppError::IdsExhausted(key) => (
                StatusCode::CONFLICT,
                "IDS_EXHAUSTED",
                format!("No new resume id can be assigned in '{key}'"),
            ),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
