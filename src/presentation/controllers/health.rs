//! Health endpoints

use axum::{extract::State, http::StatusCode, response::Json};

use crate::infrastructure::database::{self, PoolStats};
use crate::presentation::models::{ApiResponse, HealthResponse};
use crate::presentation::AppState;

/// Service liveness and version
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = ApiResponse<HealthResponse>)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// Database connectivity and pool statistics
#[utoipa::path(
    get,
    path = "/api/health/database",
    tag = "health",
    responses(
        (status = 200, description = "Database is reachable", body = ApiResponse<PoolStats>),
        (status = 503, description = "Database is unreachable")
    )
)]
pub async fn health_database(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PoolStats>>, (StatusCode, Json<ApiResponse<()>>)> {
    match database::health_check(&state.pool).await {
        Ok(stats) => Ok(Json(ApiResponse::success(stats))),
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::error(
                    "DATABASE_UNAVAILABLE",
                    "Database is unreachable",
                    None,
                )),
            ))
        }
    }
}
