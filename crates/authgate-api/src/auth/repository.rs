//! Account repository
//!
//! This module provides the database access layer for account records:
//! - `AccountRepository`: the async store interface used by the auth service
//! - `PgAccountRepository`: PostgreSQL via sqlx
//! - `InMemoryAccountRepository`: process-local store for development and tests
//!
//! Username uniqueness is enforced by the store itself; callers never check
//! for duplicates before inserting.

use async_trait::async_trait;
use authgate_core::Account;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Repository errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Username already exists: {0}")]
    UsernameTaken(String),
}

/// Account store interface
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Unique-key lookup by username
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError>;

    /// Lookup by account id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, RepositoryError>;

    /// Persist a new account
    ///
    /// Fails with `UsernameTaken` when the username is already in use; the
    /// check and the write are atomic with respect to other inserts.
    async fn insert(&self, account: Account) -> Result<Account, RepositoryError>;
}

// ============================================================================
// PostgreSQL
// ============================================================================

/// Account row as stored in PostgreSQL
#[derive(Debug, Clone, sqlx::FromRow)]
struct AccountRecord {
    id: Uuid,
    username: String,
    email: Option<String>,
    password: String,
    created_at: DateTime<Utc>,
}

impl From<AccountRecord> for Account {
    fn from(record: AccountRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            email: record.email,
            password: record.password,
            created_at: record.created_at,
        }
    }
}

/// Name of the unique constraint on `accounts.username`
const USERNAME_CONSTRAINT: &str = "accounts_username_key";

const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id UUID PRIMARY KEY,
    username TEXT NOT NULL,
    email TEXT,
    password TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT accounts_username_key UNIQUE (username)
)
"#;

/// PostgreSQL-backed account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `url`
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| RepositoryError::DatabaseError(format!("Failed to connect: {e}")))?;

        Ok(Self::new(pool))
    }

    /// Create the `accounts` table if it does not exist
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(CREATE_ACCOUNTS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(format!("Failed to create schema: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError> {
        let record = sqlx::query_as::<_, AccountRecord>(
            "SELECT id, username, email, password, created_at FROM accounts WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(format!("Failed to fetch account: {e}")))?;

        Ok(record.map(Account::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, RepositoryError> {
        let record = sqlx::query_as::<_, AccountRecord>(
            "SELECT id, username, email, password, created_at FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(format!("Failed to fetch account: {e}")))?;

        Ok(record.map(Account::from))
    }

    async fn insert(&self, account: Account) -> Result<Account, RepositoryError> {
        let record = sqlx::query_as::<_, AccountRecord>(
            r#"
            INSERT INTO accounts (id, username, email, password, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password, created_at
            "#,
        )
        .bind(account.id)
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password)
        .bind(account.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db)
                if db.is_unique_violation() && db.constraint() == Some(USERNAME_CONSTRAINT) =>
            {
                RepositoryError::UsernameTaken(account.username.clone())
            }
            _ => RepositoryError::DatabaseError(format!("Failed to create account: {e}")),
        })?;

        Ok(record.into())
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Process-local account repository
///
/// Accounts are keyed by username; a single write lock covers the
/// existence check and the insert.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError> {
        Ok(self.accounts.read().await.get(username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, RepositoryError> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|account| account.id == id)
            .cloned())
    }

    async fn insert(&self, account: Account) -> Result<Account, RepositoryError> {
        let mut accounts = self.accounts.write().await;

        if accounts.contains_key(&account.username) {
            return Err(RepositoryError::UsernameTaken(account.username));
        }

        accounts.insert(account.username.clone(), account.clone());
        Ok(account)
    }
}
