//! Application-level errors

use crate::domain::errors::DomainError;

/// Errors produced by use cases, wrapping domain failures plus the
/// infrastructure faults that arise around them.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Invalid upload: {message}")]
    InvalidUpload { message: String },

    #[error("File size {size} exceeds the limit of {limit} bytes")]
    FileTooLarge { size: usize, limit: usize },
}
