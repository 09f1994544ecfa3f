//! Album use cases

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::errors::ApplicationError;
use crate::domain::entities::{Album, Photo};
use crate::domain::errors::DomainError;
use crate::domain::repositories::{IAlbumRepository, IPhotoRepository};
use crate::domain::validation;
use crate::domain::value_objects::{AlbumId, Coordinates, UserId};
use crate::infrastructure::storage::PhotoStore;

/// An album with its photo count, as returned by list endpoints.
pub struct AlbumSummary {
    pub album: Album,
    pub photo_count: i64,
}

/// An album with its full photo listing, as returned by the detail endpoint.
pub struct AlbumDetail {
    pub album: Album,
    pub photos: Vec<Photo>,
}

pub struct CreateAlbumInput {
    pub title: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    /// When the trip happened, chosen by the user.
    pub created_at: DateTime<Utc>,
}

pub struct UpdateAlbumInput {
    pub title: Option<String>,
    pub description: Option<String>,
}

pub struct AlbumService {
    albums: Arc<dyn IAlbumRepository>,
    photos: Arc<dyn IPhotoRepository>,
    photo_store: Arc<PhotoStore>,
}

impl AlbumService {
    pub fn new(
        albums: Arc<dyn IAlbumRepository>,
        photos: Arc<dyn IPhotoRepository>,
        photo_store: Arc<PhotoStore>,
    ) -> Self {
        Self {
            albums,
            photos,
            photo_store,
        }
    }

    fn check_free_text(title: &str, description: &str) -> Result<(), DomainError> {
        if !validation::is_valid_title(title) {
            return Err(DomainError::InvalidTitle);
        }
        if !validation::is_valid_description(description) {
            return Err(DomainError::InvalidDescription);
        }
        if validation::contains_suspicious_patterns(title)
            || validation::contains_suspicious_patterns(description)
        {
            return Err(DomainError::SuspiciousInput);
        }
        Ok(())
    }

    pub async fn create(
        &self,
        user_id: UserId,
        input: CreateAlbumInput,
    ) -> Result<Album, ApplicationError> {
        let title = validation::sanitize_string(&input.title);
        let description = validation::sanitize_string(&input.description);
        Self::check_free_text(&title, &description)?;

        let coordinates = Coordinates::new(input.latitude, input.longitude)
            .map_err(|_| DomainError::InvalidCoordinates)?;

        let album = Album {
            album_id: AlbumId::generate(),
            user_id,
            title,
            description,
            coordinates,
            created_at: input.created_at,
            updated_at: Utc::now(),
        };
        self.albums.create(&album).await?;

        tracing::info!(album_id = %album.album_id, "Album created");
        Ok(album)
    }

    pub async fn list(
        &self,
        user_id: UserId,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<AlbumSummary>, ApplicationError> {
        let albums = self.albums.list_by_user(&user_id, start, end).await?;

        let mut summaries = Vec::with_capacity(albums.len());
        for album in albums {
            let photo_count = self.photos.count_by_album(&album.album_id).await?;
            summaries.push(AlbumSummary { album, photo_count });
        }
        Ok(summaries)
    }

    /// Fetch an album, enforcing that it belongs to `user_id`.
    pub async fn get_owned(
        &self,
        album_id: AlbumId,
        user_id: UserId,
    ) -> Result<Album, ApplicationError> {
        let album = self
            .albums
            .find_by_id(&album_id)
            .await?
            .ok_or_else(|| DomainError::AlbumNotFound {
                id: album_id.to_string(),
            })?;

        if album.user_id != user_id {
            return Err(DomainError::AccessDenied { resource: "album" }.into());
        }
        Ok(album)
    }

    pub async fn get_detail(
        &self,
        album_id: AlbumId,
        user_id: UserId,
    ) -> Result<AlbumDetail, ApplicationError> {
        let album = self.get_owned(album_id, user_id).await?;
        let photos = self.photos.list_by_album(&album.album_id).await?;
        Ok(AlbumDetail { album, photos })
    }

    pub async fn update(
        &self,
        album_id: AlbumId,
        user_id: UserId,
        input: UpdateAlbumInput,
    ) -> Result<Album, ApplicationError> {
        let mut album = self.get_owned(album_id, user_id).await?;

        if let Some(title) = input.title {
            album.title = validation::sanitize_string(&title);
        }
        if let Some(description) = input.description {
            album.description = validation::sanitize_string(&description);
        }
        Self::check_free_text(&album.title, &album.description)?;

        album.updated_at = Utc::now();
        self.albums.update(&album).await?;
        Ok(album)
    }

    /// Delete an album, its photo rows (by cascade) and their files on disk.
    pub async fn delete(&self, album_id: AlbumId, user_id: UserId) -> Result<(), ApplicationError> {
        let album = self.get_owned(album_id, user_id).await?;
        let photos = self.photos.list_by_album(&album.album_id).await?;

        self.albums.delete(&album.album_id, &user_id).await?;

        for photo in &photos {
            self.photo_store
                .delete(std::path::Path::new(&photo.file_path))
                .await;
        }

        tracing::info!(album_id = %album_id, "Album deleted");
        Ok(())
    }
}
