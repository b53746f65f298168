//! The store seam the task service is written against.
//!
//! [`PgTaskStore`] is the production implementation; the in-memory
//! [`MemoryTaskStore`](crate::memory::MemoryTaskStore) stands in for it in
//! tests and in `TASK_STORE=memory` deployments.

use async_trait::async_trait;
use taskboard_core::types::DbId;

use crate::models::task::{NewTask, Task, TaskChanges};
use crate::repositories::TaskRepo;
use crate::DbPool;

/// Failure inside a store: connectivity, query, or schema sync.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Persistence operations over task rows.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Establish connectivity and synchronize the schema.
    async fn connect(&self) -> Result<(), StoreError>;

    /// Cheap liveness probe.
    async fn ping(&self) -> Result<(), StoreError>;

    /// All tasks ordered by `created_at` descending, ties by `id` descending.
    async fn find_all(&self) -> Result<Vec<Task>, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Task>, StoreError>;

    /// Insert a row; the store assigns `id`, `created_at` and `updated_at`.
    async fn insert(&self, task: &NewTask) -> Result<Task, StoreError>;

    /// Apply `changes` and refresh `updated_at`. `None` if no row matched.
    async fn update(&self, id: DbId, changes: &TaskChanges) -> Result<Option<Task>, StoreError>;

    /// Hard delete. `false` if no row matched.
    async fn delete(&self, id: DbId) -> Result<bool, StoreError>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgTaskStore {
    pool: DbPool,
}

impl PgTaskStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn connect(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        tracing::info!("Database health check passed");
        crate::run_migrations(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }

    async fn find_all(&self) -> Result<Vec<Task>, StoreError> {
        Ok(TaskRepo::list(&self.pool).await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Task>, StoreError> {
        Ok(TaskRepo::find_by_id(&self.pool, id).await?)
    }

    async fn insert(&self, task: &NewTask) -> Result<Task, StoreError> {
        Ok(TaskRepo::create(&self.pool, task).await?)
    }

    async fn update(&self, id: DbId, changes: &TaskChanges) -> Result<Option<Task>, StoreError> {
        Ok(TaskRepo::update(&self.pool, id, changes).await?)
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(TaskRepo::delete(&self.pool, id).await?)
    }
}
