//! SQLx repository implementations

mod album_repository;
mod path_repository;
mod photo_repository;
mod user_repository;

pub use album_repository::SqlxAlbumRepository;
pub use path_repository::SqlxPathRepository;
pub use photo_repository::SqlxPhotoRepository;
pub use user_repository::SqlxUserRepository;

use crate::domain::errors::DomainError;

pub(crate) fn database_error(e: sqlx::Error) -> DomainError {
    tracing::error!("Database error: {}", e);
    DomainError::DatabaseError {
        message: e.to_string(),
    }
}

/// Ids are stored as TEXT; a row that fails to parse indicates corruption.
pub(crate) fn parse_stored_id<T>(raw: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr,
{
    raw.parse().map_err(|_| DomainError::DatabaseError {
        message: format!("Malformed id in database: {raw}"),
    })
}
