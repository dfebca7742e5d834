//! JWT token issuance and validation
//!
//! Implements JWT-based authentication with HMAC-SHA256 signing.
//! Tokens carry the identity payload `{id, username}` and have a configurable
//! expiration time.

use authgate_core::{AuthConfig, IdentityPayload};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// JWT Claims structure
///
/// These claims are embedded in the token and extracted during validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token issuer
    pub iss: String,
    /// Subject - account ID
    pub sub: String,
    /// Account username
    pub username: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
}

impl Claims {
    /// Recover the identity payload the token was issued for
    pub fn identity(&self) -> Result<IdentityPayload, JwtError> {
        let id = Uuid::parse_str(&self.sub).map_err(|_| JwtError::InvalidToken)?;
        Ok(IdentityPayload {
            id,
            username: self.username.clone(),
        })
    }
}

/// JWT token generation and validation errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expiration out of range: {0}s")]
    ExpirationOutOfRange(u64),

    #[error("System time error: {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),
}

/// JWT Configuration
///
/// Contains settings for token generation and validation
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HMAC signing (should be at least 256 bits)
    pub secret: String,
    /// Token expiration time in seconds (default: 3600 = 1 hour)
    pub expiration_secs: u64,
    /// Token issuer identifier
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

impl From<&AuthConfig> for JwtConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration_secs: config.jwt_expiration_secs,
            issuer: config.jwt_issuer.clone(),
        }
    }
}

/// Signs and verifies tokens with a fixed configuration
///
/// Construct once at startup and share; keys are derived from the secret
/// up front.
#[derive(Clone)]
pub struct TokenIssuer {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.config.issuer)
            .field("expiration_secs", &self.config.expiration_secs)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Sign a token for the given identity
    ///
    /// # Arguments
    ///
    /// * `identity` - Account id and username to embed
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Encoded JWT token
    /// * `Err(JwtError)` - If token generation fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// use authgate_api::auth::jwt::{JwtConfig, TokenIssuer};
    /// use authgate_core::IdentityPayload;
    /// use uuid::Uuid;
    ///
    /// let issuer = TokenIssuer::new(JwtConfig::default());
    /// let token = issuer
    ///     .sign(&IdentityPayload { id: Uuid::new_v4(), username: "alice".into() })
    ///     .expect("Failed to sign token");
    /// ```
    pub fn sign(&self, identity: &IdentityPayload) -> Result<String, JwtError> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let exp = now
            .checked_add(self.config.expiration_secs)
            .ok_or(JwtError::ExpirationOutOfRange(self.config.expiration_secs))?;

        let claims = Claims {
            iss: self.config.issuer.clone(),
            sub: identity.id.to_string(),
            username: identity.username.clone(),
            iat: now,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(token)
    }

    /// Validate a token and extract its claims
    ///
    /// Checks signature, expiry and issuer.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken,
            },
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> IdentityPayload {
        IdentityPayload {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
        }
    }

    #[test]
    fn test_sign_and_verify_token() {
        let issuer = TokenIssuer::new(JwtConfig::default());
        let identity = identity();

        let token = issuer.sign(&identity).expect("Failed to sign token");
        let claims = issuer.verify(&token).expect("Failed to verify token");

        assert_eq!(claims.sub, identity.id.to_string());
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.iss, "authgate");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.identity().unwrap(), identity);
    }

    #[test]
    fn test_invalid_token() {
        let issuer = TokenIssuer::new(JwtConfig::default());
        let result = issuer.verify("invalid.token.here");
        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret() {
        let issuer1 = TokenIssuer::new(JwtConfig {
            secret: "secret1".to_string(),
            ..Default::default()
        });
        let issuer2 = TokenIssuer::new(JwtConfig {
            secret: "secret2".to_string(),
            ..Default::default()
        });

        let token = issuer1.sign(&identity()).unwrap();

        let result = issuer2.verify(&token);
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_wrong_issuer() {
        let issuer1 = TokenIssuer::new(JwtConfig {
            issuer: "someone-else".to_string(),
            ..Default::default()
        });
        let issuer2 = TokenIssuer::new(JwtConfig::default());

        let token = issuer1.sign(&identity()).unwrap();

        assert!(matches!(issuer2.verify(&token), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_expired_token() {
        let config = JwtConfig::default();
        let issuer = TokenIssuer::new(config.clone());
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();

        // Create a token that expired 1 hour ago
        let claims = Claims {
            iss: config.issuer.clone(),
            sub: Uuid::new_v4().to_string(),
            username: "alice".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let result = issuer.verify(&token);
        assert!(matches!(result, Err(JwtError::ExpiredToken)));
    }

    #[test]
    fn test_oversized_expiration_rejected() {
        let issuer = TokenIssuer::new(JwtConfig {
            expiration_secs: u64::MAX,
            ..Default::default()
        });

        assert!(matches!(
            issuer.sign(&identity()),
            Err(JwtError::ExpirationOutOfRange(u64::MAX))
        ));
    }

    #[test]
    fn test_config_from_auth_config() {
        let auth = AuthConfig {
            jwt_secret: "s3cr3t".to_string(),
            jwt_expiration_secs: 60,
            jwt_issuer: "tests".to_string(),
            ..Default::default()
        };
        let config = JwtConfig::from(&auth);

        assert_eq!(config.secret, "s3cr3t");
        assert_eq!(config.expiration_secs, 60);
        assert_eq!(config.issuer, "tests");
    }
}
