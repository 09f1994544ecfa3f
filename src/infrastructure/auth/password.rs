//! Password hashing service using Argon2id (OWASP-recommended)

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash as Argon2Hash, PasswordHasher as Argon2Hasher,
        PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::domain::errors::DomainError;
use crate::domain::value_objects::PasswordHash;

/// Password hashing service using Argon2id
///
/// Hashing and verification run on the blocking thread pool so the Argon2
/// work cannot starve the async runtime under concurrent logins.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// OWASP minimum recommended memory cost: 19 MiB (19,456 KiB)
    const MEMORY_COST: u32 = 19_456;
    /// OWASP recommended iterations (time cost)
    const TIME_COST: u32 = 2;
    /// OWASP recommended parallelism
    const PARALLELISM: u32 = 1;
    /// Output hash length in bytes
    const OUTPUT_LEN: usize = 32;

    pub fn new() -> Self {
        Self::with_params(Self::MEMORY_COST, Self::TIME_COST, Self::PARALLELISM)
    }

    /// Custom parameters, mainly so tests can use cheap settings.
    pub fn with_params(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        let params = Params::new(memory_cost, time_cost, parallelism, Some(Self::OUTPUT_LEN))
            .unwrap_or_else(|_| Params::default());

        Self { params }
    }

    /// Hash a password on the blocking thread pool.
    pub async fn hash(&self, password: String) -> Result<PasswordHash, DomainError> {
        let params = self.params.clone();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
        })
        .await
        .map_err(|e| {
            tracing::error!("Password hash task panicked: {}", e);
            DomainError::InvalidPassword {
                reason: "Password hashing failed".to_string(),
            }
        })?
        .map(PasswordHash::from)
        .map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            DomainError::InvalidPassword {
                reason: "Password hashing failed".to_string(),
            }
        })
    }

    /// Verify a password against a stored PHC-format hash.
    pub async fn verify(&self, password: String, hash: PasswordHash) -> Result<bool, DomainError> {
        tokio::task::spawn_blocking(move || {
            let parsed_hash = Argon2Hash::new(hash.as_str()).map_err(|e| {
                tracing::error!("Failed to parse password hash: {}", e);
                DomainError::InvalidCredentials
            })?;

            let argon2 = Argon2::default();
            Ok(argon2
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok())
        })
        .await
        .map_err(|e| {
            tracing::error!("Password verify task panicked: {}", e);
            DomainError::InvalidCredentials
        })?
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
