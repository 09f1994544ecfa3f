//! Repository traits for the persistence boundary
//!
//! All implementations live in the infrastructure layer; services depend only
//! on these contracts so tests can substitute in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{Album, Photo, TravelPath, User};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{AlbumId, PathId, PhotoId, UserId};

#[async_trait]
pub trait IUserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, DomainError>;
    async fn create(&self, user: &User) -> Result<(), DomainError>;
}

#[async_trait]
pub trait IAlbumRepository: Send + Sync {
    async fn create(&self, album: &Album) -> Result<(), DomainError>;
    async fn find_by_id(&self, album_id: &AlbumId) -> Result<Option<Album>, DomainError>;
    /// Albums for a user, optionally filtered by creation time range, newest first
    async fn list_by_user(
        &self,
        user_id: &UserId,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Album>, DomainError>;
    async fn update(&self, album: &Album) -> Result<(), DomainError>;
    async fn delete(&self, album_id: &AlbumId, user_id: &UserId) -> Result<(), DomainError>;
}

#[async_trait]
pub trait IPhotoRepository: Send + Sync {
    async fn create(&self, photo: &Photo) -> Result<(), DomainError>;
    async fn find_by_id(&self, photo_id: &PhotoId) -> Result<Option<Photo>, DomainError>;
    /// Photos for an album ordered by display order, then upload time
    async fn list_by_album(&self, album_id: &AlbumId) -> Result<Vec<Photo>, DomainError>;
    async fn count_by_album(&self, album_id: &AlbumId) -> Result<i64, DomainError>;
    async fn update_order(&self, photo_id: &PhotoId, order: i64) -> Result<(), DomainError>;
    async fn delete(&self, photo_id: &PhotoId) -> Result<(), DomainError>;
}

#[async_trait]
pub trait IPathRepository: Send + Sync {
    async fn create(&self, path: &TravelPath) -> Result<(), DomainError>;
    async fn find_by_id(&self, path_id: &PathId) -> Result<Option<TravelPath>, DomainError>;
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<TravelPath>, DomainError>;
    async fn exists(
        &self,
        from_album_id: &AlbumId,
        to_album_id: &AlbumId,
        user_id: &UserId,
    ) -> Result<bool, DomainError>;
    /// The single outgoing path of an album, if any (next-destination lookup)
    async fn find_by_from_album(
        &self,
        from_album_id: &AlbumId,
        user_id: &UserId,
    ) -> Result<Option<TravelPath>, DomainError>;
    async fn delete(&self, path_id: &PathId, user_id: &UserId) -> Result<(), DomainError>;
    async fn delete_by_from_album(
        &self,
        from_album_id: &AlbumId,
        user_id: &UserId,
    ) -> Result<(), DomainError>;
}
