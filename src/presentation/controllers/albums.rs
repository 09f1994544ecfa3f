//! Album CRUD endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;

use crate::application::albums::{CreateAlbumInput, UpdateAlbumInput};
use crate::presentation::controllers::parse_album_id;
use crate::presentation::extractors::AuthUser;
use crate::presentation::models::{
    AlbumDto, AlbumListQuery, ApiFailure, ApiResponse, CreateAlbumRequest, UpdateAlbumRequest,
};
use crate::presentation::AppState;

/// Create a new album pinned to a map location
#[utoipa::path(
    post,
    path = "/api/albums",
    tag = "albums",
    request_body = CreateAlbumRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Album created", body = ApiResponse<AlbumDto>),
        (status = 400, description = "Invalid title, description, or coordinates"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_album(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateAlbumRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AlbumDto>>), ApiFailure> {
    let album = state
        .album_service
        .create(
            user.user_id,
            CreateAlbumInput {
                title: request.title,
                description: request.description,
                latitude: request.latitude,
                longitude: request.longitude,
                created_at: request.created_at.unwrap_or_else(Utc::now),
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AlbumDto::from(&album))),
    ))
}

/// List the authenticated user's albums, newest first
#[utoipa::path(
    get,
    path = "/api/albums",
    tag = "albums",
    params(AlbumListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Albums with photo counts", body = ApiResponse<Vec<AlbumDto>>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_albums(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AlbumListQuery>,
) -> Result<Json<ApiResponse<Vec<AlbumDto>>>, ApiFailure> {
    let summaries = state
        .album_service
        .list(user.user_id, query.start_date, query.end_date)
        .await?;

    let albums = summaries.iter().map(AlbumDto::from).collect();
    Ok(Json(ApiResponse::success(albums)))
}

/// Fetch one album with its photos
#[utoipa::path(
    get,
    path = "/api/albums/{id}",
    tag = "albums",
    params(("id" = String, Path, description = "Album id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Album detail", body = ApiResponse<AlbumDto>),
        (status = 403, description = "Album belongs to another user"),
        (status = 404, description = "Album not found")
    )
)]
pub async fn get_album(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AlbumDto>>, ApiFailure> {
    let album_id = parse_album_id(&id)?;
    let detail = state.album_service.get_detail(album_id, user.user_id).await?;
    Ok(Json(ApiResponse::success(AlbumDto::from(&detail))))
}

/// Update an album's title or description
#[utoipa::path(
    put,
    path = "/api/albums/{id}",
    tag = "albums",
    params(("id" = String, Path, description = "Album id")),
    request_body = UpdateAlbumRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Album updated", body = ApiResponse<AlbumDto>),
        (status = 400, description = "Invalid title or description"),
        (status = 404, description = "Album not found")
    )
)]
pub async fn update_album(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateAlbumRequest>,
) -> Result<Json<ApiResponse<AlbumDto>>, ApiFailure> {
    let album_id = parse_album_id(&id)?;
    let album = state
        .album_service
        .update(
            album_id,
            user.user_id,
            UpdateAlbumInput {
                title: request.title,
                description: request.description,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(AlbumDto::from(&album))))
}

/// Delete an album, its photos, and their files
#[utoipa::path(
    delete,
    path = "/api/albums/{id}",
    tag = "albums",
    params(("id" = String, Path, description = "Album id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Album deleted"),
        (status = 404, description = "Album not found")
    )
)]
pub async fn delete_album(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiFailure> {
    let album_id = parse_album_id(&id)?;
    state.album_service.delete(album_id, user.user_id).await?;
    Ok(Json(ApiResponse::success(())))
}
