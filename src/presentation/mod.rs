//! Presentation layer: HTTP routes, controllers, middleware, DTOs.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod static_files;

use std::sync::Arc;
use std::time::Instant;

use sqlx::SqlitePool;

use crate::application::albums::AlbumService;
use crate::application::auth::{LoginUseCase, RegisterUserUseCase};
use crate::application::paths::PathService;
use crate::application::photos::PhotoService;
use crate::config::Config;

/// Shared handler state, injected into every controller.
#[derive(Clone)]
pub struct AppState {
    pub register_use_case: Arc<RegisterUserUseCase>,
    pub login_use_case: Arc<LoginUseCase>,
    pub album_service: Arc<AlbumService>,
    pub photo_service: Arc<PhotoService>,
    pub path_service: Arc<PathService>,
    pub pool: Arc<SqlitePool>,
    pub config: Arc<Config>,
    pub started_at: Instant,
}
