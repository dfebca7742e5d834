//! Authentication service layer
//!
//! Provides the login and registration operations:
//! - `login`: validate credentials, then sign a token for the account
//! - `register`: hash the password, create the account, then sign a token
//!
//! Unknown usernames and wrong passwords fail with the same
//! `AuthError::InvalidCredentials` so callers cannot probe for accounts.

use super::jwt::{JwtError, TokenIssuer};
use super::password::{
    hash_password_blocking, verify_password_blocking, PasswordConfig, PasswordError,
};
use super::repository::{AccountRepository, RepositoryError};
use super::users::UserService;
use authgate_core::{IdentityPayload, NewAccount};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

/// User registration request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<RegisterRequest> for NewAccount {
    fn from(request: RegisterRequest) -> Self {
        Self {
            username: request.username,
            password: request.password,
            email: request.email,
        }
    }
}

/// User login request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] JwtError),
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    users: UserService,
    issuer: Arc<TokenIssuer>,
    password_config: PasswordConfig,
}

impl AuthService {
    /// Create a new authentication service
    ///
    /// Account creation goes through a `UserService` over the same repository.
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        issuer: Arc<TokenIssuer>,
        password_config: PasswordConfig,
    ) -> Self {
        let users = UserService::new(accounts.clone());
        Self {
            accounts,
            users,
            issuer,
            password_config,
        }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Login with username and password
    ///
    /// # Returns
    ///
    /// * `Ok(TokenResponse)` - Signed token for the account
    /// * `Err(AuthError::InvalidCredentials)` - Unknown username or wrong password
    /// * `Err(AuthError)` - Store, hashing or signing failure
    pub async fn login(&self, request: LoginRequest) -> Result<TokenResponse, AuthError> {
        let identity = self.validate_user(request).await?;
        let token = self.issuer.sign(&identity)?;

        tracing::info!(account_id = %identity.id, username = %identity.username, "Login successful");

        Ok(TokenResponse { token })
    }

    /// Register a new account and sign a token for it
    ///
    /// The plaintext password is replaced by its hash before the account is
    /// handed to the user service. Duplicate usernames surface as the
    /// store's `RepositoryError::UsernameTaken`, unchanged.
    pub async fn register(&self, request: RegisterRequest) -> Result<TokenResponse, AuthError> {
        let mut new_account = NewAccount::from(request);
        new_account.password =
            hash_password_blocking(new_account.password, self.password_config.clone()).await?;

        let created = self.users.create(new_account).await?;

        let identity = created.identity();
        let token = self.issuer.sign(&identity)?;

        tracing::info!(account_id = %identity.id, username = %identity.username, "Registration successful");

        Ok(TokenResponse { token })
    }

    /// Check a credential pair against the account store
    ///
    /// Performs one read-only lookup and, if an account exists, one hash
    /// comparison.
    pub async fn validate_user(
        &self,
        request: LoginRequest,
    ) -> Result<IdentityPayload, AuthError> {
        let LoginRequest { username, password } = request;

        let Some(account) = self.accounts.find_by_username(&username).await? else {
            tracing::warn!(username = %username, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let identity = account.identity();
        if !verify_password_blocking(password, account.password).await? {
            tracing::warn!(username = %username, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(identity)
    }
}
