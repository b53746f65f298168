use taskboard_core::bootstrap::BootstrapState;
use tokio::sync::watch;

use crate::service::TaskService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (the store sits behind an `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Task operations over the injected store.
    pub tasks: TaskService,
    /// Latest state published by the store bootstrapper.
    pub bootstrap: watch::Receiver<BootstrapState>,
}
