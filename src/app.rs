//! Application setup and wiring

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tokio_util::sync::CancellationToken;

use crate::application::albums::AlbumService;
use crate::application::auth::{LoginUseCase, RegisterUserUseCase};
use crate::application::paths::PathService;
use crate::application::photos::PhotoService;
use crate::config::Config;
use crate::infrastructure::auth::{JwtService, PasswordHasher};
use crate::infrastructure::database;
use crate::infrastructure::rate_limit::{spawn_sweeper, LimiterRegistry};
use crate::infrastructure::repositories::{
    SqlxAlbumRepository, SqlxPathRepository, SqlxPhotoRepository, SqlxUserRepository,
};
use crate::infrastructure::storage::PhotoStore;
use crate::presentation::extractors::AuthState;
use crate::presentation::routes::create_router;
use crate::presentation::AppState;

/// Handle returned from create_app for graceful shutdown coordination
pub struct AppHandle {
    pub router: Router,
    pub shutdown_token: CancellationToken,
}

/// Wire up the database, services, rate limiter, and router.
pub async fn create_app(config: Config) -> Result<AppHandle, Box<dyn std::error::Error>> {
    let config = Arc::new(config);
    let shutdown_token = CancellationToken::new();

    let pool = Arc::new(database::create_pool(&config.database).await?);

    let user_repository = Arc::new(SqlxUserRepository::new(pool.clone()));
    let album_repository = Arc::new(SqlxAlbumRepository::new(pool.clone()));
    let photo_repository = Arc::new(SqlxPhotoRepository::new(pool.clone()));
    let path_repository = Arc::new(SqlxPathRepository::new(pool.clone()));

    let password_hasher = Arc::new(PasswordHasher::new());
    let jwt_service = Arc::new(JwtService::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_ttl_hours,
    ));
    let photo_store = Arc::new(PhotoStore::new(config.storage.upload_dir.clone()));

    let register_use_case = Arc::new(RegisterUserUseCase::new(
        user_repository.clone(),
        password_hasher.clone(),
        jwt_service.clone(),
    ));
    let login_use_case = Arc::new(LoginUseCase::new(
        user_repository,
        password_hasher,
        jwt_service.clone(),
    ));
    let album_service = Arc::new(AlbumService::new(
        album_repository.clone(),
        photo_repository.clone(),
        photo_store.clone(),
    ));
    let photo_service = Arc::new(PhotoService::new(
        photo_repository,
        album_repository.clone(),
        photo_store,
        config.storage.max_file_size_bytes,
    ));
    let path_service = Arc::new(PathService::new(path_repository, album_repository));

    let registry = Arc::new(LimiterRegistry::new(
        config.rate_limit.max_requests_per_window,
        config.rate_limit.window(),
    ));
    if config.rate_limit.enabled {
        spawn_sweeper(
            registry.clone(),
            config.rate_limit.sweep_interval(),
            config.rate_limit.idle_retention(),
            shutdown_token.clone(),
        );
    }

    let state = AppState {
        register_use_case,
        login_use_case,
        album_service,
        photo_service,
        path_service,
        pool,
        config,
        started_at: Instant::now(),
    };
    let auth_state = AuthState { jwt_service };

    let router = create_router(state, auth_state, registry);

    Ok(AppHandle {
        router,
        shutdown_token,
    })
}
