//! Geoalbum: a geo-tagged photo album backend.
//!
//! Layered after the usual DDD split: `domain` holds the entities and
//! repository traits, `application` the use cases, `infrastructure` the
//! SQLite repositories, auth primitives, file storage, and the per-client
//! rate limiter, and `presentation` the axum routes and DTOs.

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

pub use app::{create_app, AppHandle};
pub use config::Config;
pub use logging::init_tracing;
