use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use taskboard_core::bootstrap::{BootstrapConfig, DEFAULT_DELAY, DEFAULT_RETRIES};
use taskboard_core::config::{env_parse, env_string, ConfigError};
use taskboard_db::config::DatabaseConfig;

/// Deployment mode, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    /// Store bootstrapping is skipped in the test environment.
    pub fn runs_bootstrap(self) -> bool {
        self != Environment::Test
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(format!(
                "unknown environment '{other}' (expected development, production or test)"
            )),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        };
        f.write_str(name)
    }
}

/// Which [`TaskStore`](taskboard_db::TaskStore) implementation to run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!(
                "unknown store '{other}' (expected postgres or memory)"
            )),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    pub environment: Environment,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    /// A `*` entry allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory holding the browser front end.
    pub static_dir: PathBuf,
    pub store_backend: StoreBackend,
    pub bootstrap: BootstrapConfig,
    pub database: DatabaseConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                     |
    /// |------------------------|-----------------------------|
    /// | `HOST`                 | `0.0.0.0`                   |
    /// | `PORT`                 | `3000`                      |
    /// | `APP_ENV`              | `development`               |
    /// | `CORS_ORIGINS`         | `*`                         |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                        |
    /// | `STATIC_DIR`           | `<crate>/public`            |
    /// | `TASK_STORE`           | `postgres`                  |
    /// | `DB_CONNECT_RETRIES`   | `5`                         |
    /// | `DB_CONNECT_DELAY_MS`  | `5000`                      |
    ///
    /// Database connection variables are documented on [`DatabaseConfig`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let cors_origins = env_string("CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let delay_ms: u64 = env_parse("DB_CONNECT_DELAY_MS", DEFAULT_DELAY.as_millis() as u64)?;

        let request_timeout_secs: u64 = env_parse("REQUEST_TIMEOUT_SECS", 30)?;
        let database = DatabaseConfig::from_env()?;
        check_acquire_timeout(&database, request_timeout_secs)?;

        Ok(Self {
            host: env_string("HOST", "0.0.0.0"),
            port: env_parse("PORT", 3000)?,
            environment: env_parse("APP_ENV", Environment::Development)?,
            cors_origins,
            request_timeout_secs,
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_static_dir()),
            store_backend: env_parse("TASK_STORE", StoreBackend::Postgres)?,
            bootstrap: BootstrapConfig {
                retries: env_parse("DB_CONNECT_RETRIES", DEFAULT_RETRIES)?,
                delay: Duration::from_millis(delay_ms),
            },
            database,
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// A database outage has to fail a request before the request timeout fires,
/// otherwise clients see an empty 408 instead of a store error.
pub fn check_acquire_timeout(
    database: &DatabaseConfig,
    request_timeout_secs: u64,
) -> Result<(), ConfigError> {
    if database.acquire_timeout >= Duration::from_secs(request_timeout_secs) {
        return Err(ConfigError::Invalid {
            var: "DB_ACQUIRE_TIMEOUT_SECS",
            value: database.acquire_timeout.as_secs().to_string(),
            reason: format!(
                "must be shorter than REQUEST_TIMEOUT_SECS ({request_timeout_secs})"
            ),
        });
    }
    Ok(())
}

/// The front end shipped alongside this crate.
pub fn default_static_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/public"))
}
