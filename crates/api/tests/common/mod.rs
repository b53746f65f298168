#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use taskboard_core::bootstrap::{BootstrapConfig, BootstrapState};
use taskboard_core::types::DbId;
use taskboard_db::config::DatabaseConfig;
use taskboard_db::memory::MemoryTaskStore;
use taskboard_db::models::task::{NewTask, Task, TaskChanges};
use taskboard_db::{StoreError, TaskStore};
use tokio::sync::watch;
use tower::ServiceExt;

use taskboard_api::config::{default_static_dir, Environment, ServerConfig, StoreBackend};
use taskboard_api::router::build_app_router;
use taskboard_api::service::TaskService;
use taskboard_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin and a 30-second request
/// timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: Environment::Test,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        static_dir: default_static_dir(),
        store_backend: StoreBackend::Memory,
        bootstrap: BootstrapConfig::default(),
        database: DatabaseConfig::default(),
    }
}

/// Build the full application router around `store`, with the bootstrapper
/// reported in `bootstrap`.
pub fn build_test_app_with_state(store: Arc<dyn TaskStore>, bootstrap: BootstrapState) -> Router {
    build_test_app_with(store, bootstrap, test_config())
}

/// Build the full application router with an explicit server config.
pub fn build_test_app_with(
    store: Arc<dyn TaskStore>,
    bootstrap: BootstrapState,
    config: ServerConfig,
) -> Router {
    let (_tx, rx) = watch::channel(bootstrap);

    let state = AppState {
        tasks: TaskService::new(store),
        bootstrap: rx,
    };

    build_app_router(state, &config)
}

pub fn build_test_app(store: Arc<dyn TaskStore>) -> Router {
    build_test_app_with_state(store, BootstrapState::Connected)
}

/// Router over a fresh in-memory store, plus a handle to inspect the store.
pub fn memory_app() -> (Router, Arc<MemoryTaskStore>) {
    let store = Arc::new(MemoryTaskStore::new());
    (build_test_app(store.clone()), store)
}

// ---------------------------------------------------------------------------
// Fake stores
// ---------------------------------------------------------------------------

/// Store whose every call fails as if the database were down.
pub struct UnavailableStore;

fn outage() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl TaskStore for UnavailableStore {
    async fn connect(&self) -> Result<(), StoreError> {
        Err(outage())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(outage())
    }

    async fn find_all(&self) -> Result<Vec<Task>, StoreError> {
        Err(outage())
    }

    async fn find_by_id(&self, _id: DbId) -> Result<Option<Task>, StoreError> {
        Err(outage())
    }

    async fn insert(&self, _task: &NewTask) -> Result<Task, StoreError> {
        Err(outage())
    }

    async fn update(&self, _id: DbId, _changes: &TaskChanges) -> Result<Option<Task>, StoreError> {
        Err(outage())
    }

    async fn delete(&self, _id: DbId) -> Result<bool, StoreError> {
        Err(outage())
    }
}

/// Store whose every call hangs for a minute, as a wedged connection would.
pub struct HangingStore;

async fn hang() -> Result<(), StoreError> {
    tokio::time::sleep(Duration::from_secs(60)).await;
    Err(outage())
}

#[async_trait]
impl TaskStore for HangingStore {
    async fn connect(&self) -> Result<(), StoreError> {
        hang().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        hang().await
    }

    async fn find_all(&self) -> Result<Vec<Task>, StoreError> {
        hang().await?;
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: DbId) -> Result<Option<Task>, StoreError> {
        hang().await?;
        Ok(None)
    }

    async fn insert(&self, _task: &NewTask) -> Result<Task, StoreError> {
        hang().await?;
        Err(outage())
    }

    async fn update(&self, _id: DbId, _changes: &TaskChanges) -> Result<Option<Task>, StoreError> {
        hang().await?;
        Ok(None)
    }

    async fn delete(&self, _id: DbId) -> Result<bool, StoreError> {
        hang().await?;
        Ok(false)
    }
}

/// Store that panics when listing, to exercise the panic handler.
pub struct PanickingStore;

#[async_trait]
impl TaskStore for PanickingStore {
    async fn connect(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Task>, StoreError> {
        panic!("row decoder exploded");
    }

    async fn find_by_id(&self, _id: DbId) -> Result<Option<Task>, StoreError> {
        Ok(None)
    }

    async fn insert(&self, _task: &NewTask) -> Result<Task, StoreError> {
        Err(outage())
    }

    async fn update(&self, _id: DbId, _changes: &TaskChanges) -> Result<Option<Task>, StoreError> {
        Ok(None)
    }

    async fn delete(&self, _id: DbId) -> Result<bool, StoreError> {
        Ok(false)
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
