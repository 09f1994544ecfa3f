//! Application layer: use cases composing domain and infrastructure.

pub mod albums;
pub mod auth;
pub mod errors;
pub mod paths;
pub mod photos;

pub use errors::ApplicationError;
