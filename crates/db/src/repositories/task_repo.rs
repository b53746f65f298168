//! Repository for the `tasks` table.

use sqlx::PgPool;
use taskboard_core::types::DbId;

use crate::models::task::{NewTask, Task, TaskChanges};

/// Column list for `tasks` queries.
const COLUMNS: &str = "\
    id, title, description, status, priority, due_date, \
    created_at, updated_at";

/// Provides data access for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// List every task, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Task>(&query).fetch_all(pool).await
    }

    /// Find a task by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a task. Missing status/priority fall back to their defaults.
    pub async fn create(pool: &PgPool, input: &NewTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (title, description, status, priority, due_date) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.unwrap_or_default().as_str())
            .bind(input.priority.unwrap_or_default().as_str())
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    /// Partially update a task and refresh `updated_at`.
    ///
    /// Non-nullable columns use `COALESCE`; nullable ones carry an explicit
    /// "present" flag so a supplied `NULL` clears the column. Returns `None`
    /// when no row has the given id.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET \
                 title = COALESCE($2, title), \
                 description = CASE WHEN $3 THEN $4 ELSE description END, \
                 status = COALESCE($5, status), \
                 priority = COALESCE($6, priority), \
                 due_date = CASE WHEN $7 THEN $8 ELSE due_date END, \
                 updated_at = GREATEST(NOW(), created_at) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&changes.title)
            .bind(changes.description.is_some())
            .bind(changes.description.clone().flatten())
            .bind(changes.status.map(|s| s.as_str()))
            .bind(changes.priority.map(|p| p.as_str()))
            .bind(changes.due_date.is_some())
            .bind(changes.due_date.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Delete a task by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
