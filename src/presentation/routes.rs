//! Router assembly and OpenAPI documentation

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{HeaderValue, Method, StatusCode},
    middleware,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::infrastructure::rate_limit::LimiterRegistry;
use crate::presentation::controllers::{albums, auth, health, paths, photos};
use crate::presentation::extractors::AuthState;
use crate::presentation::middleware::{
    logging_middleware, rate_limit_middleware, security_headers_middleware,
};
use crate::presentation::models::*;
use crate::presentation::static_files::serve_frontend;
use crate::presentation::AppState;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::controllers::health::health,
        crate::presentation::controllers::health::health_database,
        crate::presentation::controllers::auth::register,
        crate::presentation::controllers::auth::login,
        crate::presentation::controllers::albums::create_album,
        crate::presentation::controllers::albums::list_albums,
        crate::presentation::controllers::albums::get_album,
        crate::presentation::controllers::albums::update_album,
        crate::presentation::controllers::albums::delete_album,
        crate::presentation::controllers::photos::upload_photo,
        crate::presentation::controllers::photos::upload_photos,
        crate::presentation::controllers::photos::list_photos,
        crate::presentation::controllers::photos::get_photo,
        crate::presentation::controllers::photos::update_photo_order,
        crate::presentation::controllers::photos::delete_photo,
        crate::presentation::controllers::photos::get_photo_file,
        crate::presentation::controllers::paths::create_path,
        crate::presentation::controllers::paths::list_paths,
        crate::presentation::controllers::paths::get_path,
        crate::presentation::controllers::paths::delete_path,
        crate::presentation::controllers::paths::set_next_destination,
        crate::presentation::controllers::paths::get_next_destination,
        crate::presentation::controllers::paths::remove_next_destination
    ),
    components(schemas(
        ApiError,
        RegisterRequest,
        LoginRequest,
        UserDto,
        AuthResponse,
        CreateAlbumRequest,
        UpdateAlbumRequest,
        AlbumDto,
        PhotoDto,
        UpdateOrderRequest,
        CreatePathRequest,
        SetNextDestinationRequest,
        PathDto,
        HealthResponse
    )),
    tags(
        (name = "health", description = "Service and database health"),
        (name = "auth", description = "Account registration and login"),
        (name = "albums", description = "Geo-tagged photo albums"),
        (name = "photos", description = "Photo upload, ordering, and serving"),
        (name = "paths", description = "Travel paths between albums")
    ),
    modifiers(&SecurityAddon),
    info(
        title = "GeoAlbum API",
        description = "Backend for a map-based photo album: albums pinned to coordinates, photo uploads, and travel paths between albums.",
        license(
            name = "AGPL-3.0",
            url = "https://www.gnu.org/licenses/agpl-3.0.html"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Make the auth extractor state available to `FromRequestParts`.
async fn inject_auth_state(
    State(auth_state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(auth_state);
    next.run(request).await
}

/// JSON 404 for unknown `/api` routes; the SPA fallback must not swallow
/// these.
async fn api_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error(
            "ROUTE_NOT_FOUND",
            "API route not found",
            None,
        )),
    )
        .into_response()
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if allowed_origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(origins)
    }
}

/// Build the full application router.
pub fn create_router(
    state: AppState,
    auth_state: AuthState,
    registry: Arc<LimiterRegistry>,
) -> Router {
    let config = state.config.clone();

    let api_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/database", get(health::health_database))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/albums", post(albums::create_album).get(albums::list_albums))
        .route(
            "/albums/{id}",
            get(albums::get_album)
                .put(albums::update_album)
                .delete(albums::delete_album),
        )
        .route(
            "/albums/{id}/photos",
            post(photos::upload_photo).get(photos::list_photos),
        )
        .route("/albums/{id}/photos/multiple", post(photos::upload_photos))
        .route(
            "/photos/{id}",
            get(photos::get_photo).delete(photos::delete_photo),
        )
        .route("/photos/{id}/order", put(photos::update_photo_order))
        .route("/photos/{id}/file", get(photos::get_photo_file))
        .route("/paths", post(paths::create_path).get(paths::list_paths))
        .route(
            "/paths/{id}",
            get(paths::get_path).delete(paths::delete_path),
        )
        .route(
            "/albums/{id}/next-destination",
            post(paths::set_next_destination)
                .get(paths::get_next_destination)
                .delete(paths::remove_next_destination),
        )
        .fallback(api_not_found)
        .with_state(state);

    let mut router = Router::new()
        .nest("/api", api_routes)
        .fallback(serve_frontend);

    // Avoid leaking interactive docs in hardened deployments.
    if config.server.enable_docs {
        router =
            router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    // Innermost layer: admission happens right before dispatch, so a 429
    // still carries the security headers and shows up in the request log.
    if config.rate_limit.enabled {
        router = router.layer(middleware::from_fn_with_state(
            registry,
            rate_limit_middleware,
        ));
    }

    let service_builder = ServiceBuilder::new()
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(DefaultBodyLimit::max(config.server.max_body_size_bytes))
        .layer(cors_layer(&config.server.allowed_origins))
        .layer(middleware::from_fn_with_state(
            auth_state,
            inject_auth_state,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_seconds,
        )));

    router.layer(service_builder)
}
