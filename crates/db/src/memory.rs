//! In-process task store.
//!
//! Holds rows in a `BTreeMap` behind a tokio `RwLock`. Ids are assigned from
//! a monotonically increasing counter and never reused.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use taskboard_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::task::{NewTask, Task, TaskChanges};
use crate::store::{StoreError, TaskStore};

#[derive(Default)]
struct Inner {
    last_id: DbId,
    rows: BTreeMap<DbId, Task>,
}

#[derive(Default)]
pub struct MemoryTaskStore {
    inner: RwLock<Inner>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn connect(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.read().await;
        let mut tasks: Vec<Task> = inner.rows.values().cloned().collect();
        tasks.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(tasks)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Task>, StoreError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, task: &NewTask) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let now = Utc::now();
        let row = Task {
            id: inner.last_id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.unwrap_or_default(),
            priority: task.priority.unwrap_or_default(),
            due_date: task.due_date,
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: DbId, changes: &TaskChanges) -> Result<Option<Task>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(row) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(row);
        row.updated_at = Utc::now().max(row.created_at);
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }
}
