//! Domain entities

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{
    AlbumId, Coordinates, PasswordHash, PathId, PhotoId, UserId, Username,
};

/// A registered user
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub username: Username,
    pub password_hash: PasswordHash,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(user_id: UserId, username: Username, password_hash: PasswordHash) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            username,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A map-pinned album: a titled, geo-located collection of photos.
/// `created_at` is user-chosen (when the trip happened), `updated_at` is maintained
/// by the system.
#[derive(Debug, Clone)]
pub struct Album {
    pub album_id: AlbumId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub coordinates: Coordinates,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A photo stored on disk and recorded against an album
#[derive(Debug, Clone)]
pub struct Photo {
    pub photo_id: PhotoId,
    pub album_id: AlbumId,
    /// Original filename as uploaded
    pub filename: String,
    /// On-disk location, never exposed over the API
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub display_order: i64,
    pub uploaded_at: DateTime<Utc>,
}

/// A directed link between two albums of the same user, representing a leg of
/// a travel sequence. At most one path exists per (from, to) pair.
#[derive(Debug, Clone)]
pub struct TravelPath {
    pub path_id: PathId,
    pub user_id: UserId,
    pub from_album_id: AlbumId,
    pub to_album_id: AlbumId,
    pub created_at: DateTime<Utc>,
}
