//! Domain errors

use thiserror::Error;

/// Domain-level errors for albums, photos, paths, and authentication
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid username: {reason}")]
    InvalidUsername { reason: String },

    #[error("Invalid password: {reason}")]
    InvalidPassword { reason: String },

    #[error("Username already exists: {username}")]
    UsernameAlreadyExists { username: String },

    #[error("Invalid credentials provided")]
    InvalidCredentials,

    #[error("Invalid token provided")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid album title: must be 1-200 characters")]
    InvalidTitle,

    #[error("Invalid album description: must be at most 2000 characters")]
    InvalidDescription,

    #[error("Invalid coordinates: latitude must be -90..90, longitude -180..180")]
    InvalidCoordinates,

    #[error("Invalid display order: must be non-negative")]
    InvalidDisplayOrder,

    #[error("Input contains prohibited characters")]
    SuspiciousInput,

    #[error("Album not found: {id}")]
    AlbumNotFound { id: String },

    #[error("Photo not found: {id}")]
    PhotoNotFound { id: String },

    #[error("Path not found: {id}")]
    PathNotFound { id: String },

    #[error("User not found: {id}")]
    UserNotFound { id: String },

    #[error("Access denied: {resource} does not belong to user")]
    AccessDenied { resource: &'static str },

    #[error("A path between these albums already exists")]
    DuplicatePath,

    #[error("Unsupported media type: {mime_type}")]
    UnsupportedMediaType { mime_type: String },

    #[error("Database error: {message}")]
    DatabaseError { message: String },
}
