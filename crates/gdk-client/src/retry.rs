//! Transient-failure retry with exponential backoff.
//!
//! A fixed attempt budget with the delay doubling after each failure (base,
//! 2×base, 4×base, ...). The last error is returned when the budget is
//! exhausted.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// Retry policy for collaborator calls.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// A policy that never sleeps — for tests.
    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            base_delay: Duration::ZERO,
        }
    }

    /// Run `op` until it succeeds or the attempt budget is spent.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = self.attempts.max(1);
        let mut delay = self.base_delay;
        let mut last_attempt = 1;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) if last_attempt >= attempts => return Err(e),
                Err(e) => {
                    debug!(attempt = last_attempt, error = %e, "retrying collaborator call");
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    delay *= 2;
                    last_attempt += 1;
                }
            }
        }
    }
}
