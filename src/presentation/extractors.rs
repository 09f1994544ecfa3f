//! Authentication extractors

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use crate::domain::value_objects::UserId;
use crate::infrastructure::auth::JwtService;
use crate::presentation::models::ApiResponse;

/// Shared by the extractors; installed into request extensions by the router.
#[derive(Clone)]
pub struct AuthState {
    pub jwt_service: Arc<JwtService>,
}

/// Authenticated user resolved from a `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    pub username: String,
}

/// Like [`AuthUser`], but also accepts the token as a `?token=` query
/// parameter. Only used by the photo file endpoint, which browsers request
/// from `<img>` tags without headers.
#[derive(Debug, Clone)]
pub struct QueryTokenUser(pub AuthUser);

#[derive(Debug)]
pub struct AuthRejection {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl AuthRejection {
    fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(self.code, self.message, None);
        (self.status, Json(body)).into_response()
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
}

fn query_token(parts: &Parts) -> Option<String> {
    let query = parts.uri.query()?;
    query.split('&').find_map(|pair| {
        pair.strip_prefix("token=")
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
    })
}

fn validate(parts: &Parts, token: &str) -> Result<AuthUser, AuthRejection> {
    let auth_state = parts.extensions.get::<AuthState>().ok_or(AuthRejection {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "INTERNAL_ERROR",
        message: "Authentication is not configured".to_string(),
    })?;

    let claims = auth_state
        .jwt_service
        .validate_token(token)
        .map_err(|e| AuthRejection::unauthorized("INVALID_TOKEN", e.to_string()))?;

    let user_id = claims
        .user_id()
        .map_err(|e| AuthRejection::unauthorized("INVALID_TOKEN", e.to_string()))?;

    Ok(AuthUser {
        user_id,
        username: claims.username,
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            AuthRejection::unauthorized("MISSING_TOKEN", "Authorization header required")
        })?;
        validate(parts, &token)
    }
}

impl<S> FromRequestParts<S> for QueryTokenUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).or_else(|| query_token(parts)).ok_or_else(|| {
            AuthRejection::unauthorized("MISSING_TOKEN", "Token required via header or query")
        })?;
        validate(parts, &token).map(QueryTokenUser)
    }
}
