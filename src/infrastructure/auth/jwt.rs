//! JWT service for token generation and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::UserId;

/// Claims carried in every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (UUID string).
    pub sub: String,
    pub username: String,
    /// Expiry (unix seconds).
    pub exp: usize,
    /// Issued-at (unix seconds).
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<UserId, DomainError> {
        self.sub.parse().map_err(|_| DomainError::InvalidToken)
    }
}

/// JWT service for generating and validating tokens
#[derive(Clone)]
pub struct JwtService {
    /// Secret key for signing tokens
    secret: Arc<String>,
    /// Token TTL in hours
    token_ttl_hours: u64,
}

impl JwtService {
    pub fn new(secret: String, token_ttl_hours: u64) -> Self {
        Self {
            secret: Arc::new(secret),
            token_ttl_hours,
        }
    }

    /// Generate a signed token for a user
    pub fn generate_token(&self, user_id: UserId, username: &str) -> Result<String, DomainError> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.token_ttl_hours as i64);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let header = Header::default();
        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());

        encode(&header, &claims, &encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT token: {}", e);
            DomainError::InvalidToken
        })
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, DomainError> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        decode::<Claims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => DomainError::TokenExpired,
                    _ => DomainError::InvalidToken,
                }
            })
    }
}
