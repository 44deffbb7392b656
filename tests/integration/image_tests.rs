//! Integration tests for image uploads.

use axum::http::StatusCode;

use super::test_utils::{body_json, multipart_request, spawn_app};

#[tokio::test]
async fn test_upload_creates_record_and_file() {
    let app = spawn_app().await;

    let response = app
        .request(multipart_request("/images", "image", "photo.png", b"png-bytes"))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(!json["id"].as_str().unwrap().is_empty());
    assert_eq!(json["filename"], "photo.png");
    assert_eq!(json["originalname"], "photo.png");

    // The binary was written before the record, under the client name
    let on_disk = tokio::fs::read(app.upload_dir.join("photo.png"))
        .await
        .unwrap();
    assert_eq!(on_disk, b"png-bytes");
    app.cleanup().await;
}

#[tokio::test]
async fn test_upload_same_name_overwrites_on_disk() {
    let app = spawn_app().await;

    let response = app
        .request(multipart_request("/images", "image", "photo.png", b"first"))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request(multipart_request("/images", "image", "photo.png", b"second"))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Both uploads produced records, but the disk holds only the second
    // file's bytes.
    assert_eq!(app.store.image_count().await, 2);

    let on_disk = tokio::fs::read(app.upload_dir.join("photo.png"))
        .await
        .unwrap();
    assert_eq!(on_disk, b"second");
    app.cleanup().await;
}

#[tokio::test]
async fn test_upload_ignores_other_fields() {
    let app = spawn_app().await;

    // A field under any other name is skipped; with no "image" field the
    // upload fails.
    let response = app
        .request(multipart_request("/images", "file", "photo.png", b"bytes"))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to create image");

    assert_eq!(app.store.image_count().await, 0);
    app.cleanup().await;
}

#[tokio::test]
async fn test_upload_store_failure_returns_500() {
    let app = spawn_app().await;
    app.store.set_failing(true);

    let response = app
        .request(multipart_request("/images", "image", "photo.png", b"bytes"))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to create image");
    app.cleanup().await;
}

#[tokio::test]
async fn test_upload_binary_payload_roundtrips() {
    let app = spawn_app().await;

    // Non-UTF8 payloads must pass through untouched
    let payload: Vec<u8> = (0u8..=255).collect();

    let response = app
        .request(multipart_request("/images", "image", "blob.bin", &payload))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let on_disk = tokio::fs::read(app.upload_dir.join("blob.bin")).await.unwrap();
    assert_eq!(on_disk, payload);
    app.cleanup().await;
}
