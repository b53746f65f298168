//! Handlers for the task CRUD endpoints.
//!
//! Each handler is a thin adapter: extract, call [`TaskService`], pick the
//! status code. Validation and not-found handling live in the service.
//!
//! [`TaskService`]: crate::service::TaskService

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use taskboard_db::models::task::{CreateTaskRequest, UpdateTaskRequest};

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::state::AppState;

/// GET /api/tasks
///
/// List all tasks, newest first.
pub async fn list_tasks(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tasks = state.tasks.list().await?;
    Ok(Json(tasks))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let task = state.tasks.get(&id).await?;
    Ok(Json(task))
}

/// POST /api/tasks
///
/// Create a task. `title` is required; everything else is optional.
pub async fn create_task(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateTaskRequest>,
) -> AppResult<impl IntoResponse> {
    let task = state.tasks.create(input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /api/tasks/{id}
///
/// Partially update a task; omitted fields keep their stored values.
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateTaskRequest>,
) -> AppResult<impl IntoResponse> {
    let task = state.tasks.update(&id, input).await?;
    Ok(Json(task))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.tasks.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
