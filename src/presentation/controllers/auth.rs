//! Registration and login endpoints

use axum::{extract::State, http::StatusCode, response::Json};

use crate::presentation::models::{ApiFailure, ApiResponse, AuthResponse, LoginRequest, RegisterRequest};
use crate::presentation::AppState;

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Invalid username or password"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiFailure> {
    let authenticated = state
        .register_use_case
        .execute(request.username, request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AuthResponse::from(authenticated))),
    ))
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiFailure> {
    let authenticated = state
        .login_use_case
        .execute(request.username, request.password)
        .await?;

    Ok(Json(ApiResponse::success(AuthResponse::from(authenticated))))
}
