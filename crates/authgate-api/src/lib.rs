//! authgate API - authentication server
//!
//! Provides HTTP endpoints for account registration, login and token
//! introspection.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use state::AppState;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI document for the service
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::auth::register_handler,
        handlers::auth::login_handler,
        handlers::auth::me_handler,
    ),
    components(schemas(
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::TokenResponse,
        auth::AuthenticatedUser,
        error::ApiError,
        handlers::health::HealthResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Build the full application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
