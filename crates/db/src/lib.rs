//! PostgreSQL persistence for tasks, plus the store abstraction the API is
//! written against.

pub mod config;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;

pub use store::{PgTaskStore, StoreError, TaskStore};

pub type DbPool = sqlx::PgPool;

/// Create a lazily connecting pool.
///
/// No connection is opened until first use, so the server can start while
/// the database is still unreachable.
pub fn create_pool(config: &config::DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let options = config.connect_options()?;
    Ok(config.pool_options().connect_lazy_with(options))
}

/// Run `SELECT 1` to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
