//! Photo use cases: upload, listing, ordering, file access

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;

use crate::application::errors::ApplicationError;
use crate::domain::entities::Photo;
use crate::domain::errors::DomainError;
use crate::domain::repositories::{IAlbumRepository, IPhotoRepository};
use crate::domain::value_objects::{AlbumId, PhotoId, UserId};
use crate::infrastructure::storage::PhotoStore;

const SUPPORTED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/heic",
    "image/heif",
    "image/webp",
];

/// An uploaded file as received from the multipart form.
pub struct PhotoUpload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

pub struct PhotoService {
    photos: Arc<dyn IPhotoRepository>,
    albums: Arc<dyn IAlbumRepository>,
    photo_store: Arc<PhotoStore>,
    max_file_size: usize,
}

impl PhotoService {
    pub fn new(
        photos: Arc<dyn IPhotoRepository>,
        albums: Arc<dyn IAlbumRepository>,
        photo_store: Arc<PhotoStore>,
        max_file_size: usize,
    ) -> Self {
        Self {
            photos,
            albums,
            photo_store,
            max_file_size,
        }
    }

    async fn check_album_owned(
        &self,
        album_id: &AlbumId,
        user_id: &UserId,
    ) -> Result<(), ApplicationError> {
        let album = self
            .albums
            .find_by_id(album_id)
            .await?
            .ok_or_else(|| DomainError::AlbumNotFound {
                id: album_id.to_string(),
            })?;
        if album.user_id != *user_id {
            return Err(DomainError::AccessDenied { resource: "album" }.into());
        }
        Ok(())
    }

    /// Fetch a photo, enforcing that its album belongs to `user_id`.
    pub async fn get_owned(
        &self,
        photo_id: PhotoId,
        user_id: UserId,
    ) -> Result<Photo, ApplicationError> {
        let photo = self
            .photos
            .find_by_id(&photo_id)
            .await?
            .ok_or_else(|| DomainError::PhotoNotFound {
                id: photo_id.to_string(),
            })?;

        let album = self
            .albums
            .find_by_id(&photo.album_id)
            .await?
            .ok_or_else(|| DomainError::AlbumNotFound {
                id: photo.album_id.to_string(),
            })?;
        if album.user_id != user_id {
            return Err(DomainError::AccessDenied { resource: "photo" }.into());
        }
        Ok(photo)
    }

    pub async fn upload(
        &self,
        album_id: AlbumId,
        user_id: UserId,
        upload: PhotoUpload,
    ) -> Result<Photo, ApplicationError> {
        self.check_album_owned(&album_id, &user_id).await?;

        let mime_type = upload.mime_type.to_lowercase();
        if !SUPPORTED_MIME_TYPES.contains(&mime_type.as_str()) {
            return Err(DomainError::UnsupportedMediaType { mime_type }.into());
        }

        if upload.bytes.len() > self.max_file_size {
            return Err(ApplicationError::FileTooLarge {
                size: upload.bytes.len(),
                limit: self.max_file_size,
            });
        }

        let file_size = upload.bytes.len() as i64;
        let file_path = self.photo_store.save(&upload.filename, &upload.bytes).await?;

        // New photos are appended to the end of the album.
        let display_order = self.photos.count_by_album(&album_id).await?;

        let photo = Photo {
            photo_id: PhotoId::generate(),
            album_id,
            filename: upload.filename,
            file_path: file_path.to_string_lossy().into_owned(),
            file_size,
            mime_type,
            display_order,
            uploaded_at: Utc::now(),
        };

        if let Err(e) = self.photos.create(&photo).await {
            // Do not leave an orphaned file when the record fails.
            self.photo_store.delete(&file_path).await;
            return Err(e.into());
        }

        tracing::info!(photo_id = %photo.photo_id, album_id = %photo.album_id, "Photo uploaded");
        Ok(photo)
    }

    /// Upload several photos in one request. Fails on the first rejected
    /// file; earlier files in the batch are kept.
    pub async fn upload_many(
        &self,
        album_id: AlbumId,
        user_id: UserId,
        uploads: Vec<PhotoUpload>,
    ) -> Result<Vec<Photo>, ApplicationError> {
        let mut created = Vec::with_capacity(uploads.len());
        for upload in uploads {
            created.push(self.upload(album_id, user_id, upload).await?);
        }
        Ok(created)
    }

    pub async fn list_by_album(
        &self,
        album_id: AlbumId,
        user_id: UserId,
    ) -> Result<Vec<Photo>, ApplicationError> {
        self.check_album_owned(&album_id, &user_id).await?;
        Ok(self.photos.list_by_album(&album_id).await?)
    }

    pub async fn update_order(
        &self,
        photo_id: PhotoId,
        user_id: UserId,
        display_order: i64,
    ) -> Result<(), ApplicationError> {
        if display_order < 0 {
            return Err(DomainError::InvalidDisplayOrder.into());
        }
        self.get_owned(photo_id, user_id).await?;
        self.photos.update_order(&photo_id, display_order).await?;
        Ok(())
    }

    pub async fn delete(&self, photo_id: PhotoId, user_id: UserId) -> Result<(), ApplicationError> {
        let photo = self.get_owned(photo_id, user_id).await?;

        self.photos.delete(&photo_id).await?;
        self.photo_store.delete(Path::new(&photo.file_path)).await;

        tracing::info!(photo_id = %photo_id, "Photo deleted");
        Ok(())
    }

    /// Read the stored bytes for serving, after the ownership check.
    pub async fn read_file(
        &self,
        photo_id: PhotoId,
        user_id: UserId,
    ) -> Result<(Photo, Vec<u8>), ApplicationError> {
        let photo = self.get_owned(photo_id, user_id).await?;
        let bytes = self
            .photo_store
            .read(Path::new(&photo.file_path))
            .await
            .map_err(|_| DomainError::PhotoNotFound {
                id: photo_id.to_string(),
            })?;
        Ok((photo, bytes))
    }
}
