//! Travel path and next-destination endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::presentation::controllers::{parse_album_id, parse_path_id};
use crate::presentation::extractors::AuthUser;
use crate::presentation::models::{
    AlbumDto, ApiFailure, ApiResponse, CreatePathRequest, PathDto, SetNextDestinationRequest,
};
use crate::presentation::AppState;

/// Create a directed path between two albums
#[utoipa::path(
    post,
    path = "/api/paths",
    tag = "paths",
    request_body = CreatePathRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Path created", body = ApiResponse<PathDto>),
        (status = 404, description = "Either endpoint album not found"),
        (status = 409, description = "Path already exists")
    )
)]
pub async fn create_path(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreatePathRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PathDto>>), ApiFailure> {
    let from_album_id = parse_album_id(&request.from_album_id)?;
    let to_album_id = parse_album_id(&request.to_album_id)?;

    let resolved = state
        .path_service
        .create(user.user_id, from_album_id, to_album_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PathDto::from(&resolved))),
    ))
}

/// List the user's paths with endpoint albums resolved
#[utoipa::path(
    get,
    path = "/api/paths",
    tag = "paths",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All paths", body = ApiResponse<Vec<PathDto>>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_paths(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<PathDto>>>, ApiFailure> {
    let resolved = state.path_service.list(user.user_id).await?;
    let dtos = resolved.iter().map(PathDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// Fetch one path
#[utoipa::path(
    get,
    path = "/api/paths/{id}",
    tag = "paths",
    params(("id" = String, Path, description = "Path id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Path detail", body = ApiResponse<PathDto>),
        (status = 404, description = "Path not found")
    )
)]
pub async fn get_path(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PathDto>>, ApiFailure> {
    let path_id = parse_path_id(&id)?;
    let resolved = state.path_service.get(path_id, user.user_id).await?;
    Ok(Json(ApiResponse::success(PathDto::from(&resolved))))
}

/// Delete a path
#[utoipa::path(
    delete,
    path = "/api/paths/{id}",
    tag = "paths",
    params(("id" = String, Path, description = "Path id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Path deleted"),
        (status = 404, description = "Path not found")
    )
)]
pub async fn delete_path(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiFailure> {
    let path_id = parse_path_id(&id)?;
    state.path_service.delete(path_id, user.user_id).await?;
    Ok(Json(ApiResponse::success(())))
}

/// Set the album's next destination, replacing any existing one
#[utoipa::path(
    post,
    path = "/api/albums/{id}/next-destination",
    tag = "paths",
    params(("id" = String, Path, description = "Origin album id")),
    request_body = SetNextDestinationRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Next destination set", body = ApiResponse<PathDto>),
        (status = 404, description = "Either album not found")
    )
)]
pub async fn set_next_destination(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<SetNextDestinationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PathDto>>), ApiFailure> {
    let from_album_id = parse_album_id(&id)?;
    let to_album_id = parse_album_id(&request.to_album_id)?;

    let resolved = state
        .path_service
        .set_next_destination(user.user_id, from_album_id, to_album_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PathDto::from(&resolved))),
    ))
}

/// The album this one points at, or null
#[utoipa::path(
    get,
    path = "/api/albums/{id}/next-destination",
    tag = "paths",
    params(("id" = String, Path, description = "Origin album id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Destination album or null", body = ApiResponse<AlbumDto>),
        (status = 404, description = "Album not found")
    )
)]
pub async fn get_next_destination(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Option<AlbumDto>>>, ApiFailure> {
    let from_album_id = parse_album_id(&id)?;
    let destination = state
        .path_service
        .next_destination(from_album_id, user.user_id)
        .await?;

    Ok(Json(ApiResponse::success(
        destination.as_ref().map(AlbumDto::from),
    )))
}

/// Clear the album's next destination
#[utoipa::path(
    delete,
    path = "/api/albums/{id}/next-destination",
    tag = "paths",
    params(("id" = String, Path, description = "Origin album id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Next destination cleared"),
        (status = 404, description = "Album not found")
    )
)]
pub async fn remove_next_destination(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiFailure> {
    let from_album_id = parse_album_id(&id)?;
    state
        .path_service
        .remove_next_destination(from_album_id, user.user_id)
        .await?;
    Ok(Json(ApiResponse::success(())))
}
