//! User management
//!
//! `UserService` owns account creation. It persists whatever new-account
//! fields it is given and hands back the sanitized projection; hashing the
//! password beforehand is the caller's job.

use super::repository::{AccountRepository, RepositoryError};
use authgate_core::{Account, NewAccount, SafeAccount};
use std::sync::Arc;

/// Account creation and lookup
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn AccountRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn AccountRepository>) -> Self {
        Self { repository }
    }

    /// Create an account
    ///
    /// # Returns
    ///
    /// * `Ok(SafeAccount)` - The stored account without its password
    /// * `Err(RepositoryError::UsernameTaken)` - If the username is in use
    /// * `Err(RepositoryError::DatabaseError)` - If the store fails
    pub async fn create(&self, new: NewAccount) -> Result<SafeAccount, RepositoryError> {
        let created = self.repository.insert(Account::from_new(new)).await?;

        tracing::debug!(account_id = %created.id, username = %created.username, "Account created");

        Ok(created.to_safe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::InMemoryAccountRepository;

    #[tokio::test]
    async fn test_create_returns_sanitized_projection() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let users = UserService::new(repo.clone());

        let safe = users
            .create(NewAccount {
                username: "alice".to_string(),
                password: "$argon2id$stored".to_string(),
                email: Some("alice@example.com".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(safe.username, "alice");
        let json = serde_json::to_string(&safe).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("$argon2id$stored"));

        let stored = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(stored.id, safe.id);
        assert_eq!(stored.password, "$argon2id$stored");
    }

    #[tokio::test]
    async fn test_create_duplicate_propagates_store_error() {
        let users = UserService::new(Arc::new(InMemoryAccountRepository::new()));
        let new = NewAccount {
            username: "alice".to_string(),
            password: "hash".to_string(),
            email: None,
        };

        users.create(new.clone()).await.unwrap();
        let result = users.create(new).await;

        assert!(matches!(result, Err(RepositoryError::UsernameTaken(_))));
    }
}
