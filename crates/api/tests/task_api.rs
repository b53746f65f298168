//! HTTP-level integration tests for the task endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener, over an in-memory store.

mod common;

use axum::http::StatusCode;
use common::{body_bytes, body_json, delete, get, memory_app, post_json, put_json, send};
use serde_json::json;

async fn create(app: &axum::Router, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(app, "/api/tasks", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// POST /api/tasks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_201_with_generated_fields() {
    let (app, _) = memory_app();
    let json = create(
        &app,
        json!({
            "title": "Test Task",
            "description": "Test Description",
            "status": "todo",
            "priority": "medium"
        }),
    )
    .await;

    assert!(json["id"].is_number());
    assert_eq!(json["title"], "Test Task");
    assert_eq!(json["description"], "Test Description");
    assert_eq!(json["status"], "todo");
    assert_eq!(json["priority"], "medium");
    assert!(json["createdAt"].is_string());
    assert_eq!(json["createdAt"], json["updatedAt"]);
}

#[tokio::test]
async fn create_with_title_only_uses_defaults() {
    let (app, _) = memory_app();
    let json = create(&app, json!({"title": "T"})).await;

    assert_eq!(json["status"], "todo");
    assert_eq!(json["priority"], "medium");
    assert!(json["description"].is_null());
    assert!(json["dueDate"].is_null());
}

#[tokio::test]
async fn create_without_title_returns_400_and_persists_nothing() {
    let (app, store) = memory_app();

    for body in [
        json!({"description": "Test Description", "status": "todo"}),
        json!({"title": ""}),
        json!({"title": null}),
        json!({"title": "   "}),
    ] {
        let response = post_json(&app, "/api/tasks", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Title is required");
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    assert!(store.is_empty().await);
}

#[tokio::test]
async fn create_with_invalid_status_returns_400() {
    let (app, store) = memory_app();
    let response = post_json(&app, "/api/tasks", json!({"title": "T", "status": "blocked"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("blocked"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn create_with_invalid_due_date_returns_400() {
    let (app, _) = memory_app();
    let response = post_json(&app, "/api/tasks", json!({"title": "T", "dueDate": "tomorrow"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_body_returns_400_with_error() {
    let (app, _) = memory_app();
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/tasks")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());
}

// ---------------------------------------------------------------------------
// GET /api/tasks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_returns_newest_first() {
    let (app, _) = memory_app();
    create(&app, json!({"title": "A"})).await;
    create(&app, json!({"title": "B"})).await;

    let response = get(&app, "/api/tasks").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let titles: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["B", "A"]);
}

#[tokio::test]
async fn list_on_empty_store_returns_empty_array() {
    let (app, _) = memory_app();
    let response = get(&app, "/api/tasks").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

// ---------------------------------------------------------------------------
// GET /api/tasks/{id}
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_by_id_returns_the_task() {
    let (app, _) = memory_app();
    let created = create(&app, json!({"title": "Get Me"})).await;
    let id = created["id"].as_i64().unwrap();

    let response = get(&app, &format!("/api/tasks/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);
}

#[tokio::test]
async fn get_nonexistent_returns_404() {
    let (app, _) = memory_app();
    let response = get(&app, "/api/tasks/999999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Task with id 999999 not found");
}

#[tokio::test]
async fn get_malformed_id_returns_404() {
    let (app, _) = memory_app();
    let response = get(&app, "/api/tasks/task-123").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"].is_string());
}

// ---------------------------------------------------------------------------
// PUT /api/tasks/{id}
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_status_changes_only_status_and_updated_at() {
    let (app, _) = memory_app();
    let created = create(
        &app,
        json!({
            "title": "Report",
            "description": "Quarterly",
            "priority": "high",
            "dueDate": "2026-12-31"
        }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = put_json(&app, &format!("/api/tasks/{id}"), json!({"status": "done"})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    assert_eq!(updated["status"], "done");
    for field in ["id", "title", "description", "priority", "dueDate", "createdAt"] {
        assert_eq!(updated[field], created[field], "{field} changed");
    }
    assert!(updated["updatedAt"].is_string());
}

#[tokio::test]
async fn update_with_title_and_status() {
    let (app, _) = memory_app();
    let created = create(&app, json!({"title": "Test Task", "description": "Test Description"})).await;
    let id = created["id"].as_i64().unwrap();

    let response = put_json(
        &app,
        &format!("/api/tasks/{id}"),
        json!({"title": "Updated Task", "status": "in_progress"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["title"], "Updated Task");
    assert_eq!(json["status"], "in_progress");
    assert_eq!(json["description"], "Test Description");
}

#[tokio::test]
async fn update_explicit_null_clears_description_and_due_date() {
    let (app, _) = memory_app();
    let created = create(
        &app,
        json!({"title": "T", "description": "gone soon", "dueDate": "2026-11-15"}),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = put_json(
        &app,
        &format!("/api/tasks/{id}"),
        json!({"description": null, "dueDate": null}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["description"].is_null());
    assert!(json["dueDate"].is_null());
    assert_eq!(json["title"], "T");
}

#[tokio::test]
async fn update_empty_title_keeps_old_title() {
    let (app, _) = memory_app();
    let created = create(&app, json!({"title": "Original"})).await;
    let id = created["id"].as_i64().unwrap();

    let response = put_json(&app, &format!("/api/tasks/{id}"), json!({"title": ""})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "Original");
}

#[tokio::test]
async fn update_invalid_priority_returns_400() {
    let (app, _) = memory_app();
    let created = create(&app, json!({"title": "T"})).await;
    let id = created["id"].as_i64().unwrap();

    let response = put_json(&app, &format!("/api/tasks/{id}"), json!({"priority": "asap"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn update_nonexistent_returns_404() {
    let (app, _) = memory_app();
    let response = put_json(&app, "/api/tasks/999999", json!({"title": "Updated Task"})).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn update_nonexistent_with_invalid_payload_returns_404() {
    let (app, _) = memory_app();
    let response = put_json(&app, "/api/tasks/999", json!({"status": "bogus"})).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// DELETE /api/tasks/{id}
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_returns_204_then_404() {
    let (app, store) = memory_app();
    let created = create(&app, json!({"title": "Delete Me"})).await;
    let uri = format!("/api/tasks/{}", created["id"]);

    let response = delete(&app, &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response).await.is_empty());
    assert!(store.is_empty().await);

    let response = delete(&app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_nonexistent_returns_404() {
    let (app, _) = memory_app();
    let response = delete(&app, "/api/tasks/999999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"].is_string());
}

// ---------------------------------------------------------------------------
// Full lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn task_lifecycle_end_to_end() {
    let (app, _) = memory_app();

    let created = create(&app, json!({"title": "Buy milk", "priority": "low"})).await;
    let id = created["id"].as_i64().unwrap();
    assert!(id > 0);
    let uri = format!("/api/tasks/{id}");

    let response = get(&app, &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);

    let response = put_json(&app, &uri, json!({"status": "in_progress"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["status"], "in_progress");
    assert_eq!(updated["title"], "Buy milk");
    assert_eq!(updated["priority"], "low");

    let response = delete(&app, &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_api_route_returns_json_404() {
    let (app, _) = memory_app();
    let response = send(&app, axum::http::Method::GET, "/api/projects", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "No route for /api/projects");
}
