use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use taskboard_core::bootstrap::Bootstrapper;
use taskboard_core::config::env_string;
use taskboard_db::memory::MemoryTaskStore;
use taskboard_db::{PgTaskStore, TaskStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskboard_api::config::{ServerConfig, StoreBackend};
use taskboard_api::router::build_app_router;
use taskboard_api::service::TaskService;
use taskboard_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid configuration")?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        environment = %config.environment,
        store = ?config.store_backend,
        "Loaded server configuration",
    );

    // --- Store ---
    let store: Arc<dyn TaskStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = taskboard_db::create_pool(&config.database)
                .context("Invalid database connection settings")?;
            tracing::info!("Database connection pool created (lazy)");
            Arc::new(PgTaskStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory task store; data is lost on restart");
            Arc::new(MemoryTaskStore::new())
        }
    };

    // --- Bootstrapper ---
    // Runs alongside the server: requests are accepted (and fail with store
    // errors) until the store is connected.
    let bootstrapper = Bootstrapper::new(config.bootstrap);
    let bootstrap_rx = bootstrapper.subscribe();
    let bootstrap_handle = if config.environment.runs_bootstrap() {
        let store = Arc::clone(&store);
        Some(tokio::spawn(async move {
            let outcome = bootstrapper.run(|| store.connect()).await;
            if !outcome.is_connected() {
                tracing::warn!(
                    state = ?outcome,
                    "Server is running without a store connection; task requests will fail",
                );
            }
        }))
    } else {
        tracing::info!("Test environment: skipping store bootstrap");
        None
    };

    // --- App state ---
    let state = AppState {
        tasks: TaskService::new(store),
        bootstrap: bootstrap_rx,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let host: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(host, config.port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    if let Some(handle) = bootstrap_handle {
        handle.abort();
    }
    tracing::info!("Graceful shutdown complete");

    Ok(())
}

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "taskboard_api=debug,taskboard_db=debug,taskboard_core=info,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    if env_string("LOG_FORMAT", "pretty").eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix). If a handler cannot
/// be installed, that branch never resolves and the other one still works.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
