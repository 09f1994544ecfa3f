//! End-to-end API tests over the full router with an in-memory database.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{
    body_bytes, body_json, create_album, delete, get, json_request, multipart_upload, register,
    test_app,
};

// Minimal JPEG header so the bytes look like a real file.
const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

#[tokio::test]
async fn register_login_and_duplicate_username() {
    let (app, _uploads) = test_app().await;

    let token = register(&app, "alice").await;
    assert!(!token.is_empty());

    // Same username again conflicts.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({ "username": "alice", "password": "s3curePassw0rd!" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], "USERNAME_EXISTS");

    // Correct credentials log in.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "username": "alice", "password": "s3curePassw0rd!" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["user"]["username"], "alice");

    // Wrong password and unknown user both yield the same 401.
    for (username, password) in [("alice", "wrongPass1"), ("nobody", "s3curePassw0rd!")] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                &json!({ "username": username, "password": password }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
    }
}

#[tokio::test]
async fn register_rejects_weak_password_and_bad_username() {
    let (app, _uploads) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({ "username": "bob", "password": "short" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({ "username": "a b", "password": "s3curePassw0rd!" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let (app, _uploads) = test_app().await;

    let response = app.clone().oneshot(get("/api/albums", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get("/api/albums", Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn album_crud_round_trip() {
    let (app, _uploads) = test_app().await;
    let token = register(&app, "carol").await;

    let album_id = create_album(&app, &token, "Kyoto").await;

    // List carries photo_count.
    let response = app
        .clone()
        .oneshot(get("/api/albums", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let albums = body["data"].as_array().unwrap();
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0]["title"], "Kyoto");
    assert_eq!(albums[0]["photo_count"], 0);

    // Detail view includes an empty photo list.
    let response = app
        .clone()
        .oneshot(get(&format!("/api/albums/{album_id}"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["photos"], json!([]));

    // Partial update touches only the provided fields.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/albums/{album_id}"),
            Some(&token),
            &json!({ "title": "Kyoto 2023" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], "Kyoto 2023");
    assert_eq!(body["data"]["description"], "integration test album");

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/albums/{album_id}"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/albums/{album_id}"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn album_validation_and_date_filters() {
    let (app, _uploads) = test_app().await;
    let token = register(&app, "dave").await;

    // Out-of-range coordinates are rejected.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/albums",
            Some(&token),
            &json!({ "title": "Nowhere", "latitude": 95.0, "longitude": 0.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Two albums with user-chosen trip dates.
    for (title, created_at) in [
        ("Old trip", "2022-03-01T00:00:00Z"),
        ("New trip", "2024-07-15T00:00:00Z"),
    ] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/albums",
                Some(&token),
                &json!({
                    "title": title,
                    "latitude": 10.0,
                    "longitude": 20.0,
                    "created_at": created_at
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get(
            "/api/albums?start_date=2024-01-01T00:00:00Z",
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let albums = body["data"].as_array().unwrap();
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0]["title"], "New trip");

    let response = app
        .clone()
        .oneshot(get(
            "/api/albums?end_date=2023-01-01T00:00:00Z",
            Some(&token),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let albums = body["data"].as_array().unwrap();
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0]["title"], "Old trip");
}

#[tokio::test]
async fn photo_upload_ordering_and_file_access() {
    let (app, _uploads) = test_app().await;
    let token = register(&app, "erin").await;
    let album_id = create_album(&app, &token, "Photos").await;

    // First upload lands at display_order 0.
    let response = app
        .clone()
        .oneshot(multipart_upload(
            &format!("/api/albums/{album_id}/photos"),
            &token,
            "one.jpg",
            "image/jpeg",
            JPEG_BYTES,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["display_order"], 0);
    assert_eq!(body["data"]["mime_type"], "image/jpeg");
    let photo_id = body["data"]["id"].as_str().unwrap().to_string();

    // Second upload appends.
    let response = app
        .clone()
        .oneshot(multipart_upload(
            &format!("/api/albums/{album_id}/photos"),
            &token,
            "two.png",
            "image/png",
            JPEG_BYTES,
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["display_order"], 1);

    // Unsupported content type is refused.
    let response = app
        .clone()
        .oneshot(multipart_upload(
            &format!("/api/albums/{album_id}/photos"),
            &token,
            "notes.txt",
            "text/plain",
            b"hello",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    // Image bytes are served with the stored content type. The token is
    // accepted as a query parameter for <img> tags.
    let response = app
        .clone()
        .oneshot(get(
            &format!("/api/photos/{photo_id}/file?token={token}"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/jpeg"
    );
    assert_eq!(body_bytes(response).await, JPEG_BYTES);

    // Without any credentials the file endpoint is closed.
    let response = app
        .clone()
        .oneshot(get(&format!("/api/photos/{photo_id}/file"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Reorder, then reject a negative position.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/photos/{photo_id}/order"),
            Some(&token),
            &json!({ "display_order": 5 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/photos/{photo_id}"), Some(&token)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["display_order"], 5);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/photos/{photo_id}/order"),
            Some(&token),
            &json!({ "display_order": -1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Delete removes the record.
    let response = app
        .clone()
        .oneshot(delete(&format!("/api/photos/{photo_id}"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/photos/{photo_id}"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn paths_and_next_destination() {
    let (app, _uploads) = test_app().await;
    let token = register(&app, "frank").await;
    let tokyo = create_album(&app, &token, "Tokyo").await;
    let osaka = create_album(&app, &token, "Osaka").await;
    let nara = create_album(&app, &token, "Nara").await;

    // Create a path, then refuse the duplicate.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/paths",
            Some(&token),
            &json!({ "from_album_id": tokyo, "to_album_id": osaka }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["from_album"]["title"], "Tokyo");
    assert_eq!(body["data"]["to_album"]["title"], "Osaka");
    let path_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/paths",
            Some(&token),
            &json!({ "from_album_id": tokyo, "to_album_id": osaka }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "PATH_EXISTS");

    // Setting a next destination replaces any outgoing path.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/albums/{tokyo}/next-destination"),
            Some(&token),
            &json!({ "to_album_id": nara }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get(
            &format!("/api/albums/{tokyo}/next-destination"),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], "Nara");

    // The original Tokyo -> Osaka path was replaced, so only one path exists.
    let response = app
        .clone()
        .oneshot(get("/api/paths", Some(&token)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // The replaced path id no longer resolves.
    let response = app
        .clone()
        .oneshot(get(&format!("/api/paths/{path_id}"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Clearing the next destination leaves no outgoing paths.
    let response = app
        .clone()
        .oneshot(delete(
            &format!("/api/albums/{tokyo}/next-destination"),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get(
            &format!("/api/albums/{tokyo}/next-destination"),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn resources_are_scoped_to_their_owner() {
    let (app, _uploads) = test_app().await;
    let owner = register(&app, "grace").await;
    let intruder = register(&app, "mallory").await;
    let album_id = create_album(&app, &owner, "Private").await;

    // Another authenticated user cannot see, change, or delete it.
    let response = app
        .clone()
        .oneshot(get(&format!("/api/albums/{album_id}"), Some(&intruder)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "ACCESS_DENIED");

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/albums/{album_id}"), Some(&intruder)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The owner still gets through.
    let response = app
        .clone()
        .oneshot(get(&format!("/api/albums/{album_id}"), Some(&owner)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_ids_and_unknown_routes_are_not_found() {
    let (app, _uploads) = test_app().await;
    let token = register(&app, "henry").await;

    // A non-UUID id cannot name an existing album.
    let response = app
        .clone()
        .oneshot(get("/api/albums/not-a-uuid", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "ALBUM_NOT_FOUND");

    // Unknown API routes answer with the JSON envelope, not the SPA page.
    let response = app
        .clone()
        .oneshot(get("/api/definitely-not-here", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "ROUTE_NOT_FOUND");
}

#[tokio::test]
async fn health_spa_fallback_and_security_headers() {
    let (app, _uploads) = test_app().await;

    let response = app.clone().oneshot(get("/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "ok");

    let response = app
        .clone()
        .oneshot(get("/api/health/database", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "connected");

    // Non-API paths fall through to the embedded frontend.
    for uri in ["/", "/albums/some-client-route"] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/html"));
    }
}

#[tokio::test]
async fn oversized_uploads_are_rejected() {
    let uploads = tempfile::TempDir::new().unwrap();
    let mut config = common::test_config(&uploads);
    config.storage.max_file_size_bytes = 8;
    let app = common::build_app(config).await;

    let token = register(&app, "nina").await;
    let album_id = create_album(&app, &token, "Fuji hike").await;

    // JPEG_BYTES is 10 bytes, two over the configured limit.
    let response = app
        .clone()
        .oneshot(multipart_upload(
            &format!("/api/albums/{album_id}/photos"),
            &token,
            "summit.jpg",
            "image/jpeg",
            JPEG_BYTES,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], "FILE_TOO_LARGE");

    // A file at the limit is still accepted.
    let response = app
        .clone()
        .oneshot(multipart_upload(
            &format!("/api/albums/{album_id}/photos"),
            &token,
            "trailhead.jpg",
            "image/jpeg",
            &JPEG_BYTES[..8],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}
