//! SQLx implementation of the album repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::Album;
use crate::domain::errors::DomainError;
use crate::domain::repositories::IAlbumRepository;
use crate::domain::value_objects::{AlbumId, Coordinates, UserId};

use super::{database_error, parse_stored_id};

pub struct SqlxAlbumRepository {
    pool: Arc<SqlitePool>,
}

impl SqlxAlbumRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AlbumRow {
    id: String,
    user_id: String,
    title: String,
    description: Option<String>,
    latitude: f64,
    longitude: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AlbumRow {
    fn into_entity(self) -> Result<Album, DomainError> {
        Ok(Album {
            album_id: parse_stored_id(&self.id)?,
            user_id: parse_stored_id(&self.user_id)?,
            title: self.title,
            description: self.description.unwrap_or_default(),
            coordinates: Coordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str =
    "id, user_id, title, description, latitude, longitude, created_at, updated_at";

#[async_trait]
impl IAlbumRepository for SqlxAlbumRepository {
    #[tracing::instrument(skip(self, album), fields(album_id = %album.album_id))]
    async fn create(&self, album: &Album) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO albums (id, user_id, title, description, latitude, longitude, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(album.album_id.to_string())
        .bind(album.user_id.to_string())
        .bind(&album.title)
        .bind(&album.description)
        .bind(album.coordinates.latitude)
        .bind(album.coordinates.longitude)
        .bind(album.created_at)
        .bind(album.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(album_id = %album_id))]
    async fn find_by_id(&self, album_id: &AlbumId) -> Result<Option<Album>, DomainError> {
        let row: Option<AlbumRow> =
            sqlx::query_as(&format!("SELECT {SELECT_COLUMNS} FROM albums WHERE id = ?"))
                .bind(album_id.to_string())
                .fetch_optional(&*self.pool)
                .await
                .map_err(database_error)?;

        row.map(AlbumRow::into_entity).transpose()
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn list_by_user(
        &self,
        user_id: &UserId,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Album>, DomainError> {
        let mut sql = format!("SELECT {SELECT_COLUMNS} FROM albums WHERE user_id = ?");
        if start.is_some() {
            sql.push_str(" AND created_at >= ?");
        }
        if end.is_some() {
            sql.push_str(" AND created_at <= ?");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, AlbumRow>(&sql).bind(user_id.to_string());
        if let Some(start) = start {
            query = query.bind(start);
        }
        if let Some(end) = end {
            query = query.bind(end);
        }

        let rows = query
            .fetch_all(&*self.pool)
            .await
            .map_err(database_error)?;

        rows.into_iter().map(AlbumRow::into_entity).collect()
    }

    #[tracing::instrument(skip(self, album), fields(album_id = %album.album_id))]
    async fn update(&self, album: &Album) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE albums
             SET title = ?, description = ?, latitude = ?, longitude = ?, updated_at = ?
             WHERE id = ? AND user_id = ?",
        )
        .bind(&album.title)
        .bind(&album.description)
        .bind(album.coordinates.latitude)
        .bind(album.coordinates.longitude)
        .bind(album.updated_at)
        .bind(album.album_id.to_string())
        .bind(album.user_id.to_string())
        .execute(&*self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::AlbumNotFound {
                id: album.album_id.to_string(),
            });
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(album_id = %album_id))]
    async fn delete(&self, album_id: &AlbumId, user_id: &UserId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM albums WHERE id = ? AND user_id = ?")
            .bind(album_id.to_string())
            .bind(user_id.to_string())
            .execute(&*self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::AlbumNotFound {
                id: album_id.to_string(),
            });
        }
        Ok(())
    }
}
