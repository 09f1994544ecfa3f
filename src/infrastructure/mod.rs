//! Infrastructure layer: persistence, auth services, rate limiting, storage.

pub mod auth;
pub mod database;
pub mod rate_limit;
pub mod repositories;
pub mod storage;
