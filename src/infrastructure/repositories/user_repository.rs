//! SQLx implementation of the user repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::User;
use crate::domain::errors::DomainError;
use crate::domain::repositories::IUserRepository;
use crate::domain::value_objects::{PasswordHash, UserId, Username};

use super::{database_error, parse_stored_id};

pub struct SqlxUserRepository {
    pool: Arc<SqlitePool>,
}

impl SqlxUserRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_entity(self) -> Result<User, DomainError> {
        Ok(User {
            user_id: parse_stored_id(&self.id)?,
            username: Username::from_trusted(self.username),
            password_hash: PasswordHash::from(self.password_hash),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl IUserRepository for SqlxUserRepository {
    #[tracing::instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, password_hash, created_at, updated_at
             FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&*self.pool)
        .await
        .map_err(database_error)?;

        row.map(UserRow::into_entity).transpose()
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, password_hash, created_at, updated_at
             FROM users WHERE id = ?",
        )
        .bind(user_id.to_string())
        .fetch_optional(&*self.pool)
        .await
        .map_err(database_error)?;

        row.map(UserRow::into_entity).transpose()
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.user_id))]
    async fn create(&self, user: &User) -> Result<(), DomainError> {
        let result = sqlx::query(
            "INSERT INTO users (id, username, password_hash, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user.user_id.to_string())
        .bind(user.username.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&*self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(DomainError::UsernameAlreadyExists {
                    username: user.username.as_str().to_string(),
                })
            }
            Err(e) => Err(database_error(e)),
        }
    }
}
