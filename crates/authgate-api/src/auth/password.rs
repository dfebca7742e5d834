//! Password hashing and verification using Argon2id
//!
//! Hashes are produced with a fixed cost (memory, iterations, lanes) taken
//! from configuration at startup, a random 16-byte salt and a 32-byte output,
//! and are stored as PHC strings so verification needs nothing but the hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use authgate_core::AuthConfig;
use thiserror::Error;

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),

    #[error("Failed to verify password: {0}")]
    VerificationFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Password hashing configuration
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Time cost (iterations)
    pub time_cost: u32,
    /// Parallelism (lanes)
    pub parallelism: u32,
    /// Output length in bytes (default: 32)
    pub output_len: Option<usize>,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

impl From<&AuthConfig> for PasswordConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            memory_cost: config.hash_memory_cost,
            time_cost: config.hash_time_cost,
            parallelism: config.hash_parallelism,
            output_len: Some(32),
        }
    }
}

impl PasswordConfig {
    /// Create Argon2 parameters from this configuration
    fn to_params(&self) -> Result<Params, PasswordError> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            self.output_len,
        )
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }
}

/// Hash a plaintext password using Argon2id
///
/// # Arguments
///
/// * `password` - The plaintext password to hash
/// * `config` - Argon2 cost parameters
///
/// # Returns
///
/// * `Ok(String)` - PHC string format hash (includes algorithm, parameters, salt, and hash)
/// * `Err(PasswordError)` - If hashing fails
///
/// # Example
///
/// ```no_run
/// use authgate_api::auth::password::{hash_password, PasswordConfig};
///
/// let hash = hash_password("secret", &PasswordConfig::default()).expect("Failed to hash password");
/// // Output: $argon2id$v=19$m=19456,t=2,p=1$...
/// ```
pub fn hash_password(password: &str, config: &PasswordConfig) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = config.to_params()?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verify a plaintext password against a stored hash
///
/// The cost parameters are read from the hash itself.
///
/// # Returns
///
/// * `Ok(true)` - Password matches
/// * `Ok(false)` - Password does not match
/// * `Err(PasswordError)` - If verification fails due to invalid hash format
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
    }
}

/// [`hash_password`] on the blocking thread pool
pub async fn hash_password_blocking(
    password: String,
    config: PasswordConfig,
) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password, &config))
        .await
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
}

/// [`verify_password`] on the blocking thread pool
pub async fn verify_password_blocking(
    password: String,
    hash: String,
) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| PasswordError::VerificationFailed(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    // Light parameters keep the suite fast
    fn test_config() -> PasswordConfig {
        PasswordConfig {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
            output_len: Some(32),
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let password = "SecureP@ssw0rd!";
        let hash = hash_password(password, &test_config()).expect("Failed to hash password");

        assert_ne!(hash, password);
        assert!(verify_password(password, &hash).expect("Verification failed"));
        assert!(!verify_password("WrongPassword", &hash).expect("Verification failed"));
    }

    #[test]
    fn test_same_password_produces_different_hashes() {
        // Due to random salt, same password should produce different hashes
        let password = "SamePassword123!";

        let hash1 = hash_password(password, &test_config()).unwrap();
        let hash2 = hash_password(password, &test_config()).unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password", "invalid-hash-format");
        assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
    }

    #[test]
    fn test_plaintext_is_not_a_valid_hash() {
        let result = verify_password("secret", "secret");
        assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
    }

    #[test]
    fn test_fixed_cost_is_encoded_in_hash() {
        let config = PasswordConfig {
            memory_cost: 2048,
            time_cost: 2,
            parallelism: 1,
            output_len: Some(32),
        };

        let hash = hash_password("TestPassword123!", &config).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=2048"));
        assert!(hash.contains("t=2"));
        assert!(hash.contains("p=1"));
        assert!(verify_password("TestPassword123!", &hash).unwrap());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let config = PasswordConfig {
            memory_cost: 1,
            time_cost: 0,
            parallelism: 0,
            output_len: Some(32),
        };

        let result = hash_password("secret", &config);
        assert!(matches!(result, Err(PasswordError::HashingFailed(_))));
    }

    #[tokio::test]
    async fn test_blocking_wrappers() {
        let hash = hash_password_blocking("secret".to_string(), test_config())
            .await
            .unwrap();

        assert!(verify_password_blocking("secret".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password_blocking("nope".to_string(), hash)
            .await
            .unwrap());
    }
}
