//! HTTP controllers

pub mod albums;
pub mod auth;
pub mod health;
pub mod paths;
pub mod photos;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{AlbumId, PathId, PhotoId};
use crate::presentation::models::ApiFailure;

// Route parameters arrive as strings; a value that is not a UUID cannot name
// an existing resource, so it maps to the same 404 as a missing row.

pub(crate) fn parse_album_id(raw: &str) -> Result<AlbumId, ApiFailure> {
    raw.parse().map_err(|_| {
        DomainError::AlbumNotFound {
            id: raw.to_string(),
        }
        .into()
    })
}

pub(crate) fn parse_photo_id(raw: &str) -> Result<PhotoId, ApiFailure> {
    raw.parse().map_err(|_| {
        DomainError::PhotoNotFound {
            id: raw.to_string(),
        }
        .into()
    })
}

pub(crate) fn parse_path_id(raw: &str) -> Result<PathId, ApiFailure> {
    raw.parse().map_err(|_| {
        DomainError::PathNotFound {
            id: raw.to_string(),
        }
        .into()
    })
}
