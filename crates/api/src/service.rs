//! Task service: validation, not-found handling, and delegation to the store.
//!
//! Partial updates follow one rule, presence in the payload:
//!
//! - absent fields are left untouched;
//! - nullable fields (`description`, `dueDate`) are replaced when present,
//!   and `null` or `""` clears them;
//! - non-nullable fields (`title`, `status`, `priority`) are replaced only by
//!   a non-blank value; `null` or `""` counts as not supplied.

use std::sync::Arc;

use taskboard_core::error::CoreError;
use taskboard_core::tasks::{
    normalize_description, normalize_title, parse_due_date, parse_task_id, validate_title,
    TaskPriority, TaskStatus, TASK_ENTITY,
};
use taskboard_core::types::DbId;
use taskboard_db::models::task::{
    CreateTaskRequest, NewTask, Task, TaskChanges, UpdateTaskRequest,
};
use taskboard_db::TaskStore;

use crate::error::{AppError, AppResult};

/// CRUD operations over tasks. Cheap to clone; holds only the store handle.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// All tasks, most recently created first.
    pub async fn list(&self) -> AppResult<Vec<Task>> {
        self.store
            .find_all()
            .await
            .map_err(|e| AppError::store("Failed to list tasks", e))
    }

    pub async fn get(&self, raw_id: &str) -> AppResult<Task> {
        let id = parse_task_id(raw_id)?;
        self.find(id, raw_id).await
    }

    async fn find(&self, id: DbId, raw_id: &str) -> AppResult<Task> {
        self.store
            .find_by_id(id)
            .await
            .map_err(|e| AppError::store("Failed to load task", e))?
            .ok_or_else(|| not_found(raw_id))
    }

    pub async fn create(&self, input: CreateTaskRequest) -> AppResult<Task> {
        let new_task = validate_create(input)?;
        let task = self
            .store
            .insert(&new_task)
            .await
            .map_err(|e| AppError::store("Failed to create task", e))?;

        tracing::info!(task_id = task.id, "Task created");
        Ok(task)
    }

    /// A missing task is reported as not found even when the payload is also
    /// invalid; validation errors only surface for tasks that exist.
    pub async fn update(&self, raw_id: &str, input: UpdateTaskRequest) -> AppResult<Task> {
        let id = parse_task_id(raw_id)?;
        let changes = match validate_update(input) {
            Ok(changes) => changes,
            Err(e) => {
                self.find(id, raw_id).await?;
                return Err(e.into());
            }
        };
        let task = self
            .store
            .update(id, &changes)
            .await
            .map_err(|e| AppError::store("Failed to update task", e))?
            .ok_or_else(|| not_found(raw_id))?;

        tracing::info!(task_id = task.id, "Task updated");
        Ok(task)
    }

    pub async fn delete(&self, raw_id: &str) -> AppResult<()> {
        let id = parse_task_id(raw_id)?;
        let deleted = self
            .store
            .delete(id)
            .await
            .map_err(|e| AppError::store("Failed to delete task", e))?;

        if !deleted {
            return Err(not_found(raw_id));
        }

        tracing::info!(task_id = id, "Task deleted");
        Ok(())
    }
}

fn not_found(raw_id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: TASK_ENTITY,
        id: raw_id.to_string(),
    })
}

/// Blank strings on non-nullable enum fields mean "not supplied".
fn parse_optional<T>(raw: Option<String>) -> Result<Option<T>, CoreError>
where
    T: std::str::FromStr<Err = CoreError>,
{
    raw.filter(|v| !v.trim().is_empty())
        .map(|v| v.trim().parse())
        .transpose()
}

/// Validate a create payload into a store insert.
pub fn validate_create(input: CreateTaskRequest) -> Result<NewTask, CoreError> {
    Ok(NewTask {
        title: validate_title(input.title.as_deref())?,
        description: normalize_description(input.description),
        status: parse_optional::<TaskStatus>(input.status)?,
        priority: parse_optional::<TaskPriority>(input.priority)?,
        due_date: parse_due_date(input.due_date.as_deref())?,
    })
}

/// Validate an update payload into store-facing changes.
pub fn validate_update(input: UpdateTaskRequest) -> Result<TaskChanges, CoreError> {
    Ok(TaskChanges {
        title: input.title.and_then(|t| normalize_title(t.as_deref())),
        description: input.description.map(normalize_description),
        status: parse_optional::<TaskStatus>(input.status.flatten())?,
        priority: parse_optional::<TaskPriority>(input.priority.flatten())?,
        due_date: input
            .due_date
            .map(|d| parse_due_date(d.as_deref()))
            .transpose()?,
    })
}
