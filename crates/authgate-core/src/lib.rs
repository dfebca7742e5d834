//! authgate core - domain models and shared configuration
//!
//! This crate defines the types shared by the authentication service:
//! - Account records and their sanitized projection
//! - New-account fields handed to the account store
//! - The identity payload embedded in issued tokens
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, AuthConfig, ConfigError, DatabaseConfig, LoggingConfig, ServerConfig,
    StorageBackend,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Accounts
// ============================================================================

/// Persisted account record
///
/// `password` always holds a one-way hash (PHC string), never the plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique account identifier
    pub id: Uuid,

    /// Unique login name
    pub username: String,

    /// Contact address (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Hashed password, never serialized
    #[serde(skip_serializing)]
    pub password: String,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build a fresh record from new-account fields whose password is already hashed
    pub fn from_new(new: NewAccount) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            password: new.password,
            created_at: Utc::now(),
        }
    }

    /// Convert to the sanitized projection (no password)
    pub fn to_safe(&self) -> SafeAccount {
        SafeAccount {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }

    /// Minimal claim set for token issuance
    pub fn identity(&self) -> IdentityPayload {
        IdentityPayload {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Account view with secret fields removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeAccount {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SafeAccount {
    pub fn identity(&self) -> IdentityPayload {
        IdentityPayload {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Raw fields for creating an account
///
/// `password` is plaintext when received from a caller and is replaced with
/// its hash before the value reaches an account store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// ============================================================================
// Identity
// ============================================================================

/// Identity payload embedded in an issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityPayload {
    pub id: Uuid,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        Account::from_new(NewAccount {
            username: "alice".to_string(),
            password: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            email: Some("alice@example.com".to_string()),
        })
    }

    #[test]
    fn test_account_serialization_hides_password() {
        let account = sample_account();
        let json = serde_json::to_string(&account).unwrap();

        assert!(json.contains("alice"));
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn test_to_safe_keeps_identity() {
        let account = sample_account();
        let safe = account.to_safe();

        assert_eq!(safe.id, account.id);
        assert_eq!(safe.username, "alice");
        assert_eq!(safe.email.as_deref(), Some("alice@example.com"));
        assert_eq!(safe.identity(), account.identity());
    }

    #[test]
    fn test_from_new_assigns_distinct_ids() {
        let a = sample_account();
        let b = sample_account();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_new_account_email_optional() {
        let new: NewAccount =
            serde_json::from_str(r#"{"username":"bob","password":"secret"}"#).unwrap();
        assert_eq!(new.username, "bob");
        assert!(new.email.is_none());
    }
}
