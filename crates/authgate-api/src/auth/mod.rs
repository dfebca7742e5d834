//! Authentication module
//!
//! This module provides username/password authentication with JWT issuance:
//! - Token signing and validation
//! - Password hashing with Argon2
//! - Account repository (PostgreSQL or in-memory)
//! - User service for account creation
//! - Authentication service for login and registration
//! - Middleware for bearer-token protected routes

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod repository;
pub mod service;
pub mod users;

pub use jwt::{Claims, JwtConfig, JwtError, TokenIssuer};
pub use middleware::{auth_middleware, AuthenticatedUser, TokenAuthError};
pub use password::{hash_password, verify_password, PasswordConfig, PasswordError};
pub use repository::{
    AccountRepository, InMemoryAccountRepository, PgAccountRepository, RepositoryError,
};
pub use service::{AuthError, AuthService, LoginRequest, RegisterRequest, TokenResponse};
pub use users::UserService;
