//! Start-up connection bootstrapper.
//!
//! Drives a store's connect+sync call through a bounded number of attempts
//! with a fixed delay between them:
//!
//! ```text
//! Disconnected -> Connecting{1} -> Connected
//!                      |
//!                      +-> (sleep delay) -> Connecting{2} -> ... -> Failed
//! ```
//!
//! The current state is published on a [`watch`] channel so the HTTP layer
//! can report degraded mode while the server keeps accepting requests.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;

/// Default number of connection attempts.
pub const DEFAULT_RETRIES: u32 = 5;

/// Default delay between attempts.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(5000);

/// Connection lifecycle as seen by the bootstrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BootstrapState {
    Disconnected,
    Connecting { attempt: u32 },
    Connected,
    Failed { attempts: u32, last_error: String },
}

impl BootstrapState {
    pub fn is_connected(&self) -> bool {
        matches!(self, BootstrapState::Connected)
    }
}

/// Retry parameters. Backoff is linear: every wait is exactly `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub retries: u32,
    pub delay: Duration,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            delay: DEFAULT_DELAY,
        }
    }
}

impl BootstrapConfig {
    /// At least one attempt is always made.
    pub fn max_attempts(&self) -> u32 {
        self.retries.max(1)
    }
}

/// Bounded retry state machine around a connect call.
pub struct Bootstrapper {
    config: BootstrapConfig,
    state: watch::Sender<BootstrapState>,
}

impl Bootstrapper {
    pub fn new(config: BootstrapConfig) -> Self {
        let (state, _) = watch::channel(BootstrapState::Disconnected);
        Self { config, state }
    }

    /// Receiver that observes every transition.
    pub fn subscribe(&self) -> watch::Receiver<BootstrapState> {
        self.state.subscribe()
    }

    fn transition(&self, next: BootstrapState) {
        tracing::debug!(state = ?next, "Bootstrap state transition");
        self.state.send_replace(next);
    }

    /// Run attempts until `connect` succeeds or the attempt budget is spent.
    ///
    /// Returns the terminal state (`Connected` or `Failed`).
    pub async fn run<F, Fut, E>(&self, mut connect: F) -> BootstrapState
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: fmt::Display,
    {
        let max_attempts = self.config.max_attempts();
        let mut attempt = 0u32;

        loop {
            self.transition(BootstrapState::Connecting {
                attempt: attempt + 1,
            });

            let error = match connect().await {
                Ok(()) => {
                    tracing::info!(attempt = attempt + 1, "Store connection established");
                    self.transition(BootstrapState::Connected);
                    return BootstrapState::Connected;
                }
                Err(e) => e.to_string(),
            };

            attempt += 1;
            tracing::warn!(
                error = %error,
                "Store connection attempt {attempt}/{max_attempts} failed",
            );

            if attempt >= max_attempts {
                tracing::error!(
                    attempts = attempt,
                    error = %error,
                    "Giving up on store connection",
                );
                let failed = BootstrapState::Failed {
                    attempts: attempt,
                    last_error: error,
                };
                self.transition(failed.clone());
                return failed;
            }

            tracing::info!(
                delay_ms = self.config.delay.as_millis() as u64,
                "Retrying store connection",
            );
            tokio::time::sleep(self.config.delay).await;
        }
    }
}
