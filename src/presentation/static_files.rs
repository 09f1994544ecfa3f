//! Embedded frontend serving with SPA fallback

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

/// Frontend build artifacts, embedded at compile time.
#[derive(RustEmbed)]
#[folder = "frontend/dist"]
struct FrontendAssets;

/// Fingerprinted bundles can be cached forever; HTML must always be
/// revalidated so new deployments take effect.
fn cache_control_for(path: &str) -> HeaderValue {
    if path.ends_with(".html") || path == "index.html" {
        HeaderValue::from_static("no-cache")
    } else if path.starts_with("assets/")
        || path.ends_with(".js")
        || path.ends_with(".css")
        || path.ends_with(".woff2")
    {
        HeaderValue::from_static("public, max-age=31536000, immutable")
    } else {
        HeaderValue::from_static("public, max-age=3600")
    }
}

fn serve_asset(path: &str) -> Option<Response> {
    let asset = FrontendAssets::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let content_type = HeaderValue::from_str(mime.essence_str())
        .unwrap_or(HeaderValue::from_static("application/octet-stream"));

    Some(
        (
            [
                (header::CONTENT_TYPE, content_type),
                (header::CACHE_CONTROL, cache_control_for(path)),
            ],
            Body::from(asset.data.into_owned()),
        )
            .into_response(),
    )
}

/// Fallback handler for everything outside `/api`: serve the embedded file,
/// or index.html for extensionless client-side routes. The embed lookup
/// cannot escape the bundle, so no traversal check is needed beyond it.
pub async fn serve_frontend(request: Request) -> Response {
    let path = request.uri().path().trim_start_matches('/');
    let requested = if path.is_empty() { "index.html" } else { path };

    if let Some(response) = serve_asset(requested) {
        return response;
    }

    if !requested.contains('.') {
        if let Some(response) = serve_asset("index.html") {
            return response;
        }
    }

    (StatusCode::NOT_FOUND, "not found").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_is_never_cached() {
        assert_eq!(cache_control_for("index.html"), "no-cache");
    }

    #[test]
    fn hashed_assets_are_immutable() {
        assert_eq!(
            cache_control_for("assets/app-3f2a.js"),
            "public, max-age=31536000, immutable"
        );
    }
}
