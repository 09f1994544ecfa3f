//! Request/response DTOs and the API envelope

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::albums::{AlbumDetail, AlbumSummary};
use crate::application::auth::AuthenticatedUser;
use crate::application::paths::PathWithAlbums;
use crate::application::ApplicationError;
use crate::domain::entities::{Album, Photo, User};
use crate::domain::errors::DomainError;

/// Standard envelope: `{"success": true, "data": ...}` or
/// `{"success": false, "error": {...}}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<serde_json::Value>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
                details,
            }),
        }
    }
}

/// Controller error type: maps application failures onto HTTP statuses and
/// stable error codes.
#[derive(Debug)]
pub struct ApiFailure(pub ApplicationError);

impl From<ApplicationError> for ApiFailure {
    fn from(error: ApplicationError) -> Self {
        Self(error)
    }
}

impl From<DomainError> for ApiFailure {
    fn from(error: DomainError) -> Self {
        Self(ApplicationError::Domain(error))
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            ApplicationError::Domain(domain) => match domain {
                DomainError::InvalidUsername { .. }
                | DomainError::InvalidPassword { .. }
                | DomainError::InvalidTitle
                | DomainError::InvalidDescription
                | DomainError::InvalidCoordinates
                | DomainError::InvalidDisplayOrder
                | DomainError::SuspiciousInput => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                DomainError::UsernameAlreadyExists { .. } => {
                    (StatusCode::CONFLICT, "USERNAME_EXISTS")
                }
                DomainError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
                }
                DomainError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
                DomainError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
                DomainError::AlbumNotFound { .. } => (StatusCode::NOT_FOUND, "ALBUM_NOT_FOUND"),
                DomainError::PhotoNotFound { .. } => (StatusCode::NOT_FOUND, "PHOTO_NOT_FOUND"),
                DomainError::PathNotFound { .. } => (StatusCode::NOT_FOUND, "PATH_NOT_FOUND"),
                DomainError::UserNotFound { .. } => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
                DomainError::AccessDenied { .. } => (StatusCode::FORBIDDEN, "ACCESS_DENIED"),
                DomainError::DuplicatePath => (StatusCode::CONFLICT, "PATH_EXISTS"),
                DomainError::UnsupportedMediaType { .. } => {
                    (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_MEDIA_TYPE")
                }
                DomainError::DatabaseError { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                }
            },
            ApplicationError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            ApplicationError::InvalidUpload { .. } => (StatusCode::BAD_REQUEST, "INVALID_UPLOAD"),
            ApplicationError::FileTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE")
            }
        };

        let message = if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
            "An internal error occurred".to_string()
        } else {
            self.0.to_string()
        };

        let body = ApiResponse::<()>::error(code, message, None);
        (status, Json(body)).into_response()
    }
}

// --- Auth ---

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id.to_string(),
            username: user.username.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

impl From<AuthenticatedUser> for AuthResponse {
    fn from(auth: AuthenticatedUser) -> Self {
        Self {
            user: UserDto::from(&auth.user),
            token: auth.token,
        }
    }
}

// --- Albums ---

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAlbumRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    /// When the trip happened; defaults to now.
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAlbumRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AlbumListQuery {
    /// RFC 3339 lower bound on album creation time.
    pub start_date: Option<DateTime<Utc>>,
    /// RFC 3339 upper bound on album creation time.
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AlbumDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<PhotoDto>>,
}

impl From<&Album> for AlbumDto {
    fn from(album: &Album) -> Self {
        Self {
            id: album.album_id.to_string(),
            title: album.title.clone(),
            description: album.description.clone(),
            latitude: album.coordinates.latitude,
            longitude: album.coordinates.longitude,
            created_at: album.created_at,
            updated_at: album.updated_at,
            photo_count: None,
            photos: None,
        }
    }
}

impl From<&AlbumSummary> for AlbumDto {
    fn from(summary: &AlbumSummary) -> Self {
        let mut dto = AlbumDto::from(&summary.album);
        dto.photo_count = Some(summary.photo_count);
        dto
    }
}

impl From<&AlbumDetail> for AlbumDto {
    fn from(detail: &AlbumDetail) -> Self {
        let mut dto = AlbumDto::from(&detail.album);
        dto.photo_count = Some(detail.photos.len() as i64);
        dto.photos = Some(detail.photos.iter().map(PhotoDto::from).collect());
        dto
    }
}

// --- Photos ---

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PhotoDto {
    pub id: String,
    pub album_id: String,
    pub filename: String,
    pub file_size: i64,
    pub mime_type: String,
    pub display_order: i64,
    pub uploaded_at: DateTime<Utc>,
    /// Endpoint for fetching the image bytes.
    pub url: String,
}

impl From<&Photo> for PhotoDto {
    fn from(photo: &Photo) -> Self {
        Self {
            id: photo.photo_id.to_string(),
            album_id: photo.album_id.to_string(),
            filename: photo.filename.clone(),
            file_size: photo.file_size,
            mime_type: photo.mime_type.clone(),
            display_order: photo.display_order,
            uploaded_at: photo.uploaded_at,
            url: format!("/api/photos/{}/file", photo.photo_id),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub display_order: i64,
}

// --- Paths ---

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePathRequest {
    pub from_album_id: String,
    pub to_album_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetNextDestinationRequest {
    pub to_album_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PathDto {
    pub id: String,
    pub from_album: AlbumDto,
    pub to_album: AlbumDto,
    pub created_at: DateTime<Utc>,
}

impl From<&PathWithAlbums> for PathDto {
    fn from(resolved: &PathWithAlbums) -> Self {
        Self {
            id: resolved.path.path_id.to_string(),
            from_album: AlbumDto::from(&resolved.from_album),
            to_album: AlbumDto::from(&resolved.to_album),
            created_at: resolved.path.created_at,
        }
    }
}

// --- Health ---

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
