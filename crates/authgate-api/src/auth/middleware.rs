//! Authentication middleware for protecting routes
//!
//! Extracts and validates JWT tokens from the Authorization header.
//! On success, adds the authenticated identity to request extensions.

use super::jwt::{Claims, JwtError};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Authenticated identity extracted from a JWT
///
/// This is added to request extensions by the auth middleware
/// and can be extracted in handlers using `Extension<AuthenticatedUser>`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Account identifier
    pub id: Uuid,
    /// Account username
    pub username: String,
}

impl TryFrom<Claims> for AuthenticatedUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let identity = claims.identity()?;
        Ok(Self {
            id: identity.id,
            username: identity.username,
        })
    }
}

/// Bearer authentication errors
#[derive(Debug, Error)]
pub enum TokenAuthError {
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),
}

impl IntoResponse for TokenAuthError {
    fn into_response(self) -> Response {
        let message = match self {
            TokenAuthError::MissingAuthHeader => "Missing Authorization header",
            TokenAuthError::InvalidAuthHeader => "Invalid Authorization header format",
            TokenAuthError::InvalidToken(_) => "Invalid or expired token",
        };

        (StatusCode::UNAUTHORIZED, Json(ApiError::unauthorized(message))).into_response()
    }
}

/// Authentication middleware that requires a valid JWT token
///
/// This middleware:
/// 1. Extracts the Authorization header
/// 2. Validates the Bearer token format
/// 3. Validates the JWT signature, issuer and expiration
/// 4. Adds AuthenticatedUser to request extensions
///
/// # Usage
///
/// ```ignore
/// use axum::{Router, routing::get, middleware};
/// use authgate_api::auth::middleware::auth_middleware;
///
/// let app = Router::new()
///     .route("/protected", get(protected_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));
/// ```
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, TokenAuthError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(TokenAuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| TokenAuthError::InvalidAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(TokenAuthError::InvalidAuthHeader)?;

    let claims = match state.auth.issuer().verify(token) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(reason = %e, "Rejected bearer token");
            return Err(TokenAuthError::InvalidToken(e));
        }
    };

    let user = AuthenticatedUser::try_from(claims)?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated_user_from_claims() {
        let id = Uuid::new_v4();
        let claims = Claims {
            iss: "authgate".to_string(),
            sub: id.to_string(),
            username: "alice".to_string(),
            iat: 0,
            exp: 0,
        };

        let user = AuthenticatedUser::try_from(claims).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let claims = Claims {
            iss: "authgate".to_string(),
            sub: "not-a-uuid".to_string(),
            username: "alice".to_string(),
            iat: 0,
            exp: 0,
        };

        assert!(matches!(
            AuthenticatedUser::try_from(claims),
            Err(JwtError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_error_responses_are_unauthorized() {
        for (err, message) in [
            (TokenAuthError::MissingAuthHeader, "Missing Authorization header"),
            (
                TokenAuthError::InvalidAuthHeader,
                "Invalid Authorization header format",
            ),
            (
                TokenAuthError::InvalidToken(JwtError::ExpiredToken),
                "Invalid or expired token",
            ),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["code"], "UNAUTHORIZED");
            assert_eq!(json["message"], message);
        }
    }
}
