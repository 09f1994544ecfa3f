//! SQLx implementation of the photo repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::Photo;
use crate::domain::errors::DomainError;
use crate::domain::repositories::IPhotoRepository;
use crate::domain::value_objects::{AlbumId, PhotoId};

use super::{database_error, parse_stored_id};

pub struct SqlxPhotoRepository {
    pool: Arc<SqlitePool>,
}

impl SqlxPhotoRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PhotoRow {
    id: String,
    album_id: String,
    filename: String,
    file_path: String,
    file_size: i64,
    mime_type: String,
    display_order: i64,
    uploaded_at: DateTime<Utc>,
}

impl PhotoRow {
    fn into_entity(self) -> Result<Photo, DomainError> {
        Ok(Photo {
            photo_id: parse_stored_id(&self.id)?,
            album_id: parse_stored_id(&self.album_id)?,
            filename: self.filename,
            file_path: self.file_path,
            file_size: self.file_size,
            mime_type: self.mime_type,
            display_order: self.display_order,
            uploaded_at: self.uploaded_at,
        })
    }
}

const SELECT_COLUMNS: &str =
    "id, album_id, filename, file_path, file_size, mime_type, display_order, uploaded_at";

#[async_trait]
impl IPhotoRepository for SqlxPhotoRepository {
    #[tracing::instrument(skip(self, photo), fields(photo_id = %photo.photo_id))]
    async fn create(&self, photo: &Photo) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO photos (id, album_id, filename, file_path, file_size, mime_type, display_order, uploaded_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(photo.photo_id.to_string())
        .bind(photo.album_id.to_string())
        .bind(&photo.filename)
        .bind(&photo.file_path)
        .bind(photo.file_size)
        .bind(&photo.mime_type)
        .bind(photo.display_order)
        .bind(photo.uploaded_at)
        .execute(&*self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(photo_id = %photo_id))]
    async fn find_by_id(&self, photo_id: &PhotoId) -> Result<Option<Photo>, DomainError> {
        let row: Option<PhotoRow> =
            sqlx::query_as(&format!("SELECT {SELECT_COLUMNS} FROM photos WHERE id = ?"))
                .bind(photo_id.to_string())
                .fetch_optional(&*self.pool)
                .await
                .map_err(database_error)?;

        row.map(PhotoRow::into_entity).transpose()
    }

    #[tracing::instrument(skip(self), fields(album_id = %album_id))]
    async fn list_by_album(&self, album_id: &AlbumId) -> Result<Vec<Photo>, DomainError> {
        let rows: Vec<PhotoRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM photos WHERE album_id = ?
             ORDER BY display_order ASC, uploaded_at ASC"
        ))
        .bind(album_id.to_string())
        .fetch_all(&*self.pool)
        .await
        .map_err(database_error)?;

        rows.into_iter().map(PhotoRow::into_entity).collect()
    }

    #[tracing::instrument(skip(self), fields(album_id = %album_id))]
    async fn count_by_album(&self, album_id: &AlbumId) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM photos WHERE album_id = ?")
            .bind(album_id.to_string())
            .fetch_one(&*self.pool)
            .await
            .map_err(database_error)
    }

    #[tracing::instrument(skip(self), fields(photo_id = %photo_id))]
    async fn update_order(&self, photo_id: &PhotoId, order: i64) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE photos SET display_order = ? WHERE id = ?")
            .bind(order)
            .bind(photo_id.to_string())
            .execute(&*self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PhotoNotFound {
                id: photo_id.to_string(),
            });
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(photo_id = %photo_id))]
    async fn delete(&self, photo_id: &PhotoId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM photos WHERE id = ?")
            .bind(photo_id.to_string())
            .execute(&*self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PhotoNotFound {
                id: photo_id.to_string(),
            });
        }
        Ok(())
    }
}
