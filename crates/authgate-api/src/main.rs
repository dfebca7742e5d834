//! authgate API Server
//!
//! Author: hephaex@gmail.com

use authgate_api::{create_router, state::AppState};
use authgate_core::config::{AppConfig, LoggingConfig};
use std::sync::Arc;

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "authgate_api={level},authgate_core={level},tower_http=debug",
            level = logging.level
        )
        .into()
    });

    if logging.json_format {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration: optional file, then environment overrides
    let config = match std::env::var("AUTHGATE_CONFIG") {
        Ok(path) => AppConfig::from_file(path)?.with_env_override()?,
        Err(_) => AppConfig::from_env()?,
    };

    init_tracing(&config.logging);

    let addr = config.server.bind_addr();
    tracing::info!(backend = ?config.database.backend, "Connecting account store");

    let state = Arc::new(AppState::connect(config).await?);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("authgate API server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
