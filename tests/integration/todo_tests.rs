//! Integration tests for todo CRUD and the paginated listing.

use axum::http::StatusCode;
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use todo_api::store::Image;

use super::test_utils::{body_json, create_todo, get_request, json_request, spawn_app};

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_todo_returns_record() {
    let app = spawn_app().await;

    let response = app
        .request(json_request(
            "POST",
            "/todos",
            json!({ "title": "buy milk", "description": "2 liters" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(!json["id"].as_str().unwrap().is_empty());
    assert_eq!(json["title"], "buy milk");
    assert_eq!(json["description"], "2 liters");
    assert_eq!(json["completed"], false);
    app.cleanup().await;
}

#[tokio::test]
async fn test_create_todo_without_description() {
    let app = spawn_app().await;

    let response = app
        .request(json_request("POST", "/todos", json!({ "title": "walk dog" })))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["title"], "walk dog");
    assert!(json.get("description").is_none());
    assert_eq!(json["completed"], false);
    app.cleanup().await;
}

#[tokio::test]
async fn test_create_todo_store_failure_returns_500() {
    let app = spawn_app().await;
    app.store.set_failing(true);

    let response = app
        .request(json_request("POST", "/todos", json!({ "title": "t" })))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to create todo");
    app.cleanup().await;
}

// =============================================================================
// List / Pagination
// =============================================================================

#[tokio::test]
async fn test_list_pagination_counts() {
    let app = spawn_app().await;

    let total = 12;
    for i in 0..total {
        create_todo(&app, &format!("todo-{i}"), None).await;
    }

    // Page P of N records holds min(5, max(0, N - 5*(P-1))) entries
    for (page, expected) in [(1u64, 5), (2, 5), (3, 2), (4, 0)] {
        let response = app.request(get_request(&format!("/todos?page={page}"))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), expected, "page {page}");

        // Every listed todo carries an images array
        for entry in entries {
            assert!(entry["images"].as_array().is_some());
        }
    }
    app.cleanup().await;
}

#[tokio::test]
async fn test_list_default_page_is_first() {
    let app = spawn_app().await;

    for i in 0..7 {
        create_todo(&app, &format!("todo-{i}"), None).await;
    }

    let response = app.request(get_request("/todos")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[0]["title"], "todo-0");
    assert_eq!(entries[4]["title"], "todo-4");
    app.cleanup().await;
}

#[tokio::test]
async fn test_list_junk_page_degrades_to_default() {
    let app = spawn_app().await;

    for i in 0..7 {
        create_todo(&app, &format!("todo-{i}"), None).await;
    }

    for uri in ["/todos?page=abc", "/todos?page=0", "/todos?page=-3"] {
        let response = app.request(get_request(uri)).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");

        let json = body_json(response).await;
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 5, "{uri}");
        assert_eq!(entries[0]["title"], "todo-0", "{uri}");
    }
    app.cleanup().await;
}

#[tokio::test]
async fn test_list_images_empty_for_uploaded_images() {
    let app = spawn_app().await;

    create_todo(&app, "todo with no images", None).await;

    // Upload an image through the normal path; it gets no todoId, so the
    // listing's join can never pick it up.
    let response = app
        .request(super::test_utils::multipart_request(
            "/images",
            "image",
            "photo.png",
            b"png-bytes",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.request(get_request("/todos")).await;
    let json = body_json(response).await;
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0]["images"].as_array().unwrap().is_empty());
    app.cleanup().await;
}

#[tokio::test]
async fn test_list_attaches_images_by_todo_id() {
    let app = spawn_app().await;

    let first = create_todo(&app, "with image", None).await;
    create_todo(&app, "without image", None).await;

    // Seed an image with a populated todoId directly; the join groups it
    // under the matching todo only.
    app.store
        .seed_image(Image {
            id: Some(ObjectId::new()),
            filename: "linked.png".to_string(),
            originalname: "linked.png".to_string(),
            todo_id: Some(ObjectId::parse_str(&first).unwrap()),
        })
        .await;

    let response = app.request(get_request("/todos")).await;
    let json = body_json(response).await;
    let entries = json.as_array().unwrap();

    let first_images = entries[0]["images"].as_array().unwrap();
    assert_eq!(first_images.len(), 1);
    assert_eq!(first_images[0]["filename"], "linked.png");

    assert!(entries[1]["images"].as_array().unwrap().is_empty());
    app.cleanup().await;
}

#[tokio::test]
async fn test_list_store_failure_returns_500() {
    let app = spawn_app().await;
    app.store.set_failing(true);

    let response = app.request(get_request("/todos")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to retrieve todos");
    app.cleanup().await;
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_overwrites_absent_fields() {
    let app = spawn_app().await;

    let id = create_todo(&app, "buy milk", Some("2 liters")).await;

    // A body carrying only `completed` wipes title and description
    let response = app
        .request(json_request(
            "PUT",
            &format!("/todos/{id}"),
            json!({ "completed": true }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["completed"], true);
    assert_eq!(json["title"], "");
    assert!(json.get("description").is_none());

    // The stored record lost the fields too
    let stored = app
        .store
        .get_todo(ObjectId::parse_str(&id).unwrap())
        .await
        .unwrap();
    assert_eq!(stored.title, "");
    assert!(stored.description.is_none());
    assert!(stored.completed);
    app.cleanup().await;
}

#[tokio::test]
async fn test_update_returns_post_update_record() {
    let app = spawn_app().await;

    let id = create_todo(&app, "old title", None).await;

    let response = app
        .request(json_request(
            "PUT",
            &format!("/todos/{id}"),
            json!({ "title": "new title", "description": "added", "completed": true }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], id);
    assert_eq!(json["title"], "new title");
    assert_eq!(json["description"], "added");
    assert_eq!(json["completed"], true);
    app.cleanup().await;
}

#[tokio::test]
async fn test_update_unknown_id_is_null_success() {
    let app = spawn_app().await;

    // A well-formed id with no record behind it is not a 404: the response
    // succeeds with a null body.
    let response = app
        .request(json_request(
            "PUT",
            &format!("/todos/{}", ObjectId::new().to_hex()),
            json!({ "completed": true }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json.is_null());
    app.cleanup().await;
}

#[tokio::test]
async fn test_update_malformed_id_returns_500() {
    let app = spawn_app().await;

    let response = app
        .request(json_request(
            "PUT",
            "/todos/not-a-valid-id",
            json!({ "completed": true }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to update todo");
    app.cleanup().await;
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_removes_record() {
    let app = spawn_app().await;

    let id = create_todo(&app, "ephemeral", None).await;
    assert_eq!(app.store.todo_count().await, 1);

    let response = app
        .request(
            axum::http::Request::builder()
                .method("DELETE")
                .uri(format!("/todos/{id}"))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Todo deleted successfully");
    assert_eq!(app.store.todo_count().await, 0);
    app.cleanup().await;
}

#[tokio::test]
async fn test_delete_nonexistent_id_same_success() {
    let app = spawn_app().await;

    // No existence check: deleting an absent id is indistinguishable from
    // deleting a live record.
    let response = app
        .request(
            axum::http::Request::builder()
                .method("DELETE")
                .uri(format!("/todos/{}", ObjectId::new().to_hex()))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Todo deleted successfully");
    app.cleanup().await;
}

#[tokio::test]
async fn test_delete_malformed_id_returns_500() {
    let app = spawn_app().await;

    let response = app
        .request(
            axum::http::Request::builder()
                .method("DELETE")
                .uri("/todos/not-a-valid-id")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to delete todo");
    app.cleanup().await;
}
