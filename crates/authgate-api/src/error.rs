//! API error handling
//!
//! Author: hephaex@gmail.com

use crate::auth::{AuthError, RepositoryError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn invalid_credentials() -> Self {
        Self::new("INVALID_CREDENTIALS", "Invalid credentials")
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn internal_error() -> Self {
        Self::new("INTERNAL_ERROR", "Internal server error")
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Unknown username or wrong password
    InvalidCredentials,
    Conflict(String),
    Internal(String),
    Database(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::InvalidCredentials => {
                (StatusCode::NOT_FOUND, ApiError::invalid_credentials())
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ApiError::conflict(msg)),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, ApiError::internal_error())
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("DATABASE_ERROR", "Database operation failed"),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            AuthError::Repository(RepositoryError::UsernameTaken(username)) => {
                AppError::Conflict(format!("Username already exists: {username}"))
            }
            AuthError::Repository(RepositoryError::DatabaseError(msg)) => AppError::Database(msg),
            AuthError::Password(e) => AppError::Internal(e.to_string()),
            AuthError::Token(e) => AppError::Internal(e.to_string()),
        }
    }
}
