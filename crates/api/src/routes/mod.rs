pub mod health;
pub mod tasks;

use axum::extract::OriginalUri;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /tasks                                           list, create
/// /tasks/{id}                                      get, update, delete
/// ```
///
/// Any other path under `/api` gets a JSON 404.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/tasks", tasks::router())
        .fallback(api_not_found)
}

async fn api_not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    tracing::warn!(%uri, "No API route matched");
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": format!("No route for {}", uri.path()),
            "code": "NOT_FOUND",
        })),
    )
}
