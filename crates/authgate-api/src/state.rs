//! Application state management
//!
//! Author: hephaex@gmail.com

use crate::auth::{
    AccountRepository, AuthService, InMemoryAccountRepository, JwtConfig, PasswordConfig,
    PgAccountRepository, RepositoryError, TokenIssuer,
};
use authgate_core::{AppConfig, StorageBackend};
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Server start time
    pub start_time: Instant,
    /// Login and registration
    pub auth: AuthService,
}

impl AppState {
    /// Build state around an existing account store
    ///
    /// Signing and hashing settings are taken from `config.auth` here and
    /// nowhere else.
    pub fn new(config: AppConfig, accounts: Arc<dyn AccountRepository>) -> Self {
        let issuer = Arc::new(TokenIssuer::new(JwtConfig::from(&config.auth)));
        let password_config = PasswordConfig::from(&config.auth);
        let auth = AuthService::new(accounts, issuer, password_config);

        Self {
            config,
            start_time: Instant::now(),
            auth,
        }
    }

    /// State backed by a fresh in-memory account store
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(config, Arc::new(InMemoryAccountRepository::new()))
    }

    /// Connect the account store named by `config.database`
    pub async fn connect(config: AppConfig) -> Result<Self, RepositoryError> {
        let accounts: Arc<dyn AccountRepository> = match config.database.backend {
            StorageBackend::Postgres => {
                let repo =
                    PgAccountRepository::connect(&config.database.url, config.database.pool_size)
                        .await?;
                repo.ensure_schema().await?;
                Arc::new(repo)
            }
            StorageBackend::Memory => Arc::new(InMemoryAccountRepository::new()),
        };

        Ok(Self::new(config, accounts))
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory(AppConfig::default())
    }
}
