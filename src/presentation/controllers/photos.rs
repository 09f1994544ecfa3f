//! Photo endpoints: upload, listing, ordering, deletion, file serving

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};

use crate::application::photos::PhotoUpload;
use crate::application::ApplicationError;
use crate::presentation::controllers::{parse_album_id, parse_photo_id};
use crate::presentation::extractors::{AuthUser, QueryTokenUser};
use crate::presentation::models::{ApiFailure, ApiResponse, PhotoDto, UpdateOrderRequest};
use crate::presentation::AppState;

/// Pull file parts out of a multipart form. Non-file fields are ignored.
async fn collect_uploads(mut multipart: Multipart) -> Result<Vec<PhotoUpload>, ApiFailure> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiFailure::from(ApplicationError::InvalidUpload {
            message: format!("Malformed multipart body: {e}"),
        })
    })? {
        let Some(filename) = field.file_name().map(|f| f.to_string()) else {
            continue;
        };
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(|e| {
            ApiFailure::from(ApplicationError::InvalidUpload {
                message: format!("Failed to read upload: {e}"),
            })
        })?;

        uploads.push(PhotoUpload {
            filename,
            mime_type,
            bytes: bytes.to_vec(),
        });
    }

    Ok(uploads)
}

/// Upload a single photo to an album
#[utoipa::path(
    post,
    path = "/api/albums/{id}/photos",
    tag = "photos",
    params(("id" = String, Path, description = "Album id")),
    request_body(content_type = "multipart/form-data"),
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Photo stored", body = ApiResponse<PhotoDto>),
        (status = 400, description = "No file in request"),
        (status = 404, description = "Album not found"),
        (status = 413, description = "File exceeds the configured size limit"),
        (status = 415, description = "Unsupported image type")
    )
)]
pub async fn upload_photo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<PhotoDto>>), ApiFailure> {
    let album_id = parse_album_id(&id)?;

    let mut uploads = collect_uploads(multipart).await?;
    let upload = uploads
        .pop()
        .ok_or(ApiFailure::from(ApplicationError::InvalidUpload {
            message: "No file field in request".to_string(),
        }))?;

    let photo = state
        .photo_service
        .upload(album_id, user.user_id, upload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PhotoDto::from(&photo))),
    ))
}

/// Upload several photos to an album in one request
#[utoipa::path(
    post,
    path = "/api/albums/{id}/photos/multiple",
    tag = "photos",
    params(("id" = String, Path, description = "Album id")),
    request_body(content_type = "multipart/form-data"),
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Photos stored", body = ApiResponse<Vec<PhotoDto>>),
        (status = 404, description = "Album not found"),
        (status = 413, description = "A file exceeds the configured size limit"),
        (status = 415, description = "Unsupported image type")
    )
)]
pub async fn upload_photos(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Vec<PhotoDto>>>), ApiFailure> {
    let album_id = parse_album_id(&id)?;
    let uploads = collect_uploads(multipart).await?;

    let photos = state
        .photo_service
        .upload_many(album_id, user.user_id, uploads)
        .await?;

    let dtos = photos.iter().map(PhotoDto::from).collect();
    Ok((StatusCode::CREATED, Json(ApiResponse::success(dtos))))
}

/// List an album's photos in display order
#[utoipa::path(
    get,
    path = "/api/albums/{id}/photos",
    tag = "photos",
    params(("id" = String, Path, description = "Album id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Photos in display order", body = ApiResponse<Vec<PhotoDto>>),
        (status = 404, description = "Album not found")
    )
)]
pub async fn list_photos(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<PhotoDto>>>, ApiFailure> {
    let album_id = parse_album_id(&id)?;
    let photos = state
        .photo_service
        .list_by_album(album_id, user.user_id)
        .await?;

    let dtos = photos.iter().map(PhotoDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// Fetch one photo's metadata
#[utoipa::path(
    get,
    path = "/api/photos/{id}",
    tag = "photos",
    params(("id" = String, Path, description = "Photo id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Photo metadata", body = ApiResponse<PhotoDto>),
        (status = 404, description = "Photo not found")
    )
)]
pub async fn get_photo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PhotoDto>>, ApiFailure> {
    let photo_id = parse_photo_id(&id)?;
    let photo = state.photo_service.get_owned(photo_id, user.user_id).await?;
    Ok(Json(ApiResponse::success(PhotoDto::from(&photo))))
}

/// Change a photo's position within its album
#[utoipa::path(
    put,
    path = "/api/photos/{id}/order",
    tag = "photos",
    params(("id" = String, Path, description = "Photo id")),
    request_body = UpdateOrderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order updated"),
        (status = 400, description = "Negative display order"),
        (status = 404, description = "Photo not found")
    )
)]
pub async fn update_photo_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<ApiResponse<()>>, ApiFailure> {
    let photo_id = parse_photo_id(&id)?;
    state
        .photo_service
        .update_order(photo_id, user.user_id, request.display_order)
        .await?;
    Ok(Json(ApiResponse::success(())))
}

/// Delete a photo and its file
#[utoipa::path(
    delete,
    path = "/api/photos/{id}",
    tag = "photos",
    params(("id" = String, Path, description = "Photo id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Photo deleted"),
        (status = 404, description = "Photo not found")
    )
)]
pub async fn delete_photo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiFailure> {
    let photo_id = parse_photo_id(&id)?;
    state.photo_service.delete(photo_id, user.user_id).await?;
    Ok(Json(ApiResponse::success(())))
}

/// Serve the image bytes. Accepts the JWT in the Authorization header or as
/// `?token=`, so the frontend can point `<img>` tags straight at it.
#[utoipa::path(
    get,
    path = "/api/photos/{id}/file",
    tag = "photos",
    params(
        ("id" = String, Path, description = "Photo id"),
        ("token" = Option<String>, Query, description = "JWT for img-tag access")
    ),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Photo not found")
    )
)]
pub async fn get_photo_file(
    State(state): State<AppState>,
    QueryTokenUser(user): QueryTokenUser,
    Path(id): Path<String>,
) -> Result<Response, ApiFailure> {
    let photo_id = parse_photo_id(&id)?;
    let (photo, bytes) = state.photo_service.read_file(photo_id, user.user_id).await?;

    let content_type = HeaderValue::from_str(&photo.mime_type)
        .unwrap_or(HeaderValue::from_static("application/octet-stream"));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static("private, max-age=3600"),
            ),
        ],
        bytes,
    )
        .into_response())
}
