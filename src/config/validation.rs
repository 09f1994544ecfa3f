//! Configuration validation

use crate::config::{AuthConfig, DatabaseConfig, RateLimitConfig, ServerConfig, StorageConfig};

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Server configuration error: {message}")]
    Server { message: String },

    #[error("Database configuration error: {message}")]
    Database { message: String },

    #[error("Authentication configuration error: {message}")]
    Auth { message: String },

    #[error("Rate limit configuration error: {message}")]
    RateLimit { message: String },

    #[error("Storage configuration error: {message}")]
    Storage { message: String },
}

impl ValidationError {
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::RateLimit {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.host.is_empty() {
            return Err(ValidationError::server("host cannot be empty"));
        }
        if self.port == 0 {
            return Err(ValidationError::server("port must be > 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(ValidationError::server(
                "request_timeout_seconds must be > 0",
            ));
        }
        if self.max_body_size_bytes == 0 {
            return Err(ValidationError::server("max_body_size_bytes must be > 0"));
        }
        Ok(())
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::database("url cannot be empty"));
        }
        if self.max_connections == 0 {
            return Err(ValidationError::database("max_connections must be > 0"));
        }
        Ok(())
    }
}

impl Validate for AuthConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.jwt_secret.len() < 32 {
            return Err(ValidationError::auth(
                "jwt_secret must be at least 32 bytes",
            ));
        }
        if self.token_ttl_hours == 0 {
            return Err(ValidationError::auth("token_ttl_hours must be > 0"));
        }
        Ok(())
    }
}

impl Validate for RateLimitConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !self.enabled {
            return Ok(());
        }
        if self.max_requests_per_window == 0 {
            return Err(ValidationError::rate_limit(
                "max_requests_per_window must be > 0",
            ));
        }
        if self.window_seconds == 0 {
            return Err(ValidationError::rate_limit("window_seconds must be > 0"));
        }
        if self.sweep_interval_seconds == 0 {
            return Err(ValidationError::rate_limit(
                "sweep_interval_seconds must be > 0",
            ));
        }
        Ok(())
    }
}

impl Validate for StorageConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.upload_dir.as_os_str().is_empty() {
            return Err(ValidationError::storage("upload_dir cannot be empty"));
        }
        if self.max_file_size_bytes == 0 {
            return Err(ValidationError::storage("max_file_size_bytes must be > 0"));
        }
        Ok(())
    }
}
