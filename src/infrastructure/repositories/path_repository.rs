//! SQLx implementation of the travel path repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::TravelPath;
use crate::domain::errors::DomainError;
use crate::domain::repositories::IPathRepository;
use crate::domain::value_objects::{AlbumId, PathId, UserId};

use super::{database_error, parse_stored_id};

pub struct SqlxPathRepository {
    pool: Arc<SqlitePool>,
}

impl SqlxPathRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PathRow {
    id: String,
    user_id: String,
    from_album_id: String,
    to_album_id: String,
    created_at: DateTime<Utc>,
}

impl PathRow {
    fn into_entity(self) -> Result<TravelPath, DomainError> {
        Ok(TravelPath {
            path_id: parse_stored_id(&self.id)?,
            user_id: parse_stored_id(&self.user_id)?,
            from_album_id: parse_stored_id(&self.from_album_id)?,
            to_album_id: parse_stored_id(&self.to_album_id)?,
            created_at: self.created_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, user_id, from_album_id, to_album_id, created_at";

#[async_trait]
impl IPathRepository for SqlxPathRepository {
    #[tracing::instrument(skip(self, path), fields(path_id = %path.path_id))]
    async fn create(&self, path: &TravelPath) -> Result<(), DomainError> {
        let result = sqlx::query(
            "INSERT INTO paths (id, user_id, from_album_id, to_album_id, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(path.path_id.to_string())
        .bind(path.user_id.to_string())
        .bind(path.from_album_id.to_string())
        .bind(path.to_album_id.to_string())
        .bind(path.created_at)
        .execute(&*self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(DomainError::DuplicatePath)
            }
            Err(e) => Err(database_error(e)),
        }
    }

    #[tracing::instrument(skip(self), fields(path_id = %path_id))]
    async fn find_by_id(&self, path_id: &PathId) -> Result<Option<TravelPath>, DomainError> {
        let row: Option<PathRow> =
            sqlx::query_as(&format!("SELECT {SELECT_COLUMNS} FROM paths WHERE id = ?"))
                .bind(path_id.to_string())
                .fetch_optional(&*self.pool)
                .await
                .map_err(database_error)?;

        row.map(PathRow::into_entity).transpose()
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<TravelPath>, DomainError> {
        let rows: Vec<PathRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM paths WHERE user_id = ? ORDER BY created_at ASC"
        ))
        .bind(user_id.to_string())
        .fetch_all(&*self.pool)
        .await
        .map_err(database_error)?;

        rows.into_iter().map(PathRow::into_entity).collect()
    }

    #[tracing::instrument(skip(self))]
    async fn exists(
        &self,
        from_album_id: &AlbumId,
        to_album_id: &AlbumId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM paths
             WHERE from_album_id = ? AND to_album_id = ? AND user_id = ?",
        )
        .bind(from_album_id.to_string())
        .bind(to_album_id.to_string())
        .bind(user_id.to_string())
        .fetch_one(&*self.pool)
        .await
        .map_err(database_error)?;

        Ok(count > 0)
    }

    #[tracing::instrument(skip(self), fields(from_album_id = %from_album_id))]
    async fn find_by_from_album(
        &self,
        from_album_id: &AlbumId,
        user_id: &UserId,
    ) -> Result<Option<TravelPath>, DomainError> {
        let row: Option<PathRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM paths WHERE from_album_id = ? AND user_id = ?"
        ))
        .bind(from_album_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&*self.pool)
        .await
        .map_err(database_error)?;

        row.map(PathRow::into_entity).transpose()
    }

    #[tracing::instrument(skip(self), fields(path_id = %path_id))]
    async fn delete(&self, path_id: &PathId, user_id: &UserId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM paths WHERE id = ? AND user_id = ?")
            .bind(path_id.to_string())
            .bind(user_id.to_string())
            .execute(&*self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PathNotFound {
                id: path_id.to_string(),
            });
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(from_album_id = %from_album_id))]
    async fn delete_by_from_album(
        &self,
        from_album_id: &AlbumId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM paths WHERE from_album_id = ? AND user_id = ?")
            .bind(from_album_id.to_string())
            .bind(user_id.to_string())
            .execute(&*self.pool)
            .await
            .map_err(database_error)?;

        Ok(())
    }
}
