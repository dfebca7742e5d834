//! Authentication API handlers
//!
//! Provides HTTP endpoints for registration, login and token introspection.
//!
//! Author: hephaex@gmail.com

use crate::auth::{AuthenticatedUser, LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use std::sync::Arc;

/// Register a new account
///
/// Creates the account and returns a token for it. No validation is applied
/// to the fields beyond what the account store enforces.
///
/// # Request Body
///
/// * `username` - Unique login name
/// * `password` - Plaintext password (stored hashed)
/// * `email` - Optional contact address
///
/// # Responses
///
/// * `201 Created` - Account created, returns token
/// * `409 Conflict` - Username already exists
/// * `500 Internal Server Error` - Server error
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account registered successfully", body = crate::auth::TokenResponse),
        (status = 409, description = "Username already exists", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.auth.register(request).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with username and password
///
/// Unknown usernames and wrong passwords produce the same response.
///
/// # Responses
///
/// * `200 OK` - Authentication successful, returns token
/// * `404 Not Found` - Invalid credentials
/// * `500 Internal Server Error` - Server error
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = crate::auth::TokenResponse),
        (status = 404, description = "Invalid credentials", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.auth.login(request).await?;

    Ok(Json(response))
}

/// Identity carried by the presented token
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Token identity", body = AuthenticatedUser),
        (status = 401, description = "Missing or invalid token", body = crate::error::ApiError),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn me_handler(Extension(user): Extension<AuthenticatedUser>) -> impl IntoResponse {
    Json(user)
}
