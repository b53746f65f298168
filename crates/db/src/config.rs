use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use taskboard_core::config::{env_parse, env_string, ConfigError};

/// PostgreSQL connection settings.
///
/// `DATABASE_URL`, when set, takes precedence over the individual parts.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub username: String,
    pub password: String,
    /// Pool size (default: `5`).
    pub max_connections: u32,
    /// How long a query waits for a connection before failing (default: `5s`).
    /// Must stay below the HTTP request timeout so an unreachable database
    /// surfaces as a store error rather than a timed-out request.
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".into(),
            port: 5432,
            name: "todo_app".into(),
            username: "postgres".into(),
            password: "postgres".into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(10),
        }
    }
}

impl DatabaseConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default     |
    /// |---------------------------|-------------|
    /// | `DATABASE_URL`            | unset       |
    /// | `DB_HOST`                 | `localhost` |
    /// | `DB_PORT`                 | `5432`      |
    /// | `DB_NAME`                 | `todo_app`  |
    /// | `DB_USERNAME`             | `postgres`  |
    /// | `DB_PASSWORD`             | `postgres`  |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `5`         |
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            url: std::env::var("DATABASE_URL").ok().filter(|u| !u.is_empty()),
            host: env_string("DB_HOST", &defaults.host),
            port: env_parse("DB_PORT", defaults.port)?,
            name: env_string("DB_NAME", &defaults.name),
            username: env_string("DB_USERNAME", &defaults.username),
            password: env_string("DB_PASSWORD", &defaults.password),
            acquire_timeout: Duration::from_secs(env_parse(
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout.as_secs(),
            )?),
            ..defaults
        })
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match &self.url {
            Some(url) => url.parse(),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .database(&self.name)
                .username(&self.username)
                .password(&self.password)),
        }
    }

    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(0)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
    }
}
