//! SQLite connection pool and schema setup

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;

use crate::config::DatabaseConfig;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        username TEXT UNIQUE NOT NULL,
        password_hash TEXT NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS albums (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL,
        created_at DATETIME NOT NULL,
        updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS photos (
        id TEXT PRIMARY KEY,
        album_id TEXT NOT NULL,
        filename TEXT NOT NULL,
        file_path TEXT NOT NULL,
        file_size INTEGER NOT NULL,
        mime_type TEXT NOT NULL,
        display_order INTEGER NOT NULL DEFAULT 0,
        uploaded_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (album_id) REFERENCES albums(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS paths (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        from_album_id TEXT NOT NULL,
        to_album_id TEXT NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY (from_album_id) REFERENCES albums(id) ON DELETE CASCADE,
        FOREIGN KEY (to_album_id) REFERENCES albums(id) ON DELETE CASCADE,
        UNIQUE(from_album_id, to_album_id)
    )",
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_users_username ON users(username)",
    "CREATE INDEX IF NOT EXISTS idx_albums_user_id ON albums(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_albums_user_created ON albums(user_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_photos_album_id ON photos(album_id)",
    "CREATE INDEX IF NOT EXISTS idx_photos_album_order ON photos(album_id, display_order, uploaded_at)",
    "CREATE INDEX IF NOT EXISTS idx_paths_user_id ON paths(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_paths_from_album ON paths(from_album_id)",
    "CREATE INDEX IF NOT EXISTS idx_paths_user_from ON paths(user_id, from_album_id)",
];

/// Open the pool with WAL journaling and foreign keys on, then ensure the
/// schema exists.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(config.busy_timeout_seconds));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    tracing::info!(
        max_connections = config.max_connections,
        "Database connection established"
    );

    Ok(pool)
}

/// Create tables and indexes if they do not exist yet.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA.iter().chain(INDEXES) {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Pool statistics reported by the database health endpoint.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct PoolStats {
    pub status: &'static str,
    pub size: u32,
    pub idle: usize,
    pub max_connections: u32,
}

pub async fn health_check(pool: &SqlitePool) -> Result<PoolStats, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool).await?;
    Ok(PoolStats {
        status: "connected",
        size: pool.size(),
        idle: pool.num_idle(),
        max_connections: pool.options().get_max_connections(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) async fn memory_pool() -> SqlitePool {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            busy_timeout_seconds: 5,
        };
        create_pool(&config).await.unwrap()
    }

    #[tokio::test]
    async fn schema_creation_is_idempotent() {
        let pool = memory_pool().await;
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn health_check_reports_connected() {
        let pool = memory_pool().await;
        let stats = health_check(&pool).await.unwrap();
        assert_eq!(stats.status, "connected");
    }
}
