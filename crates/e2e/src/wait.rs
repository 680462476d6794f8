//! Explicit waits: poll a condition until it holds or the budget runs out

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::debug;

use crate::config::WaitConfig;
use crate::error::{E2eError, E2eResult};

/// Bounded fixed-interval polling loop
#[derive(Debug, Clone, Copy)]
pub struct Waiter {
    timeout: Duration,
    poll_interval: Duration,
}

impl Waiter {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    pub fn from_config(config: &WaitConfig) -> Self {
        Self::new(config.timeout(), config.poll_interval())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Poll `predicate` until it yields `Some`, or fail with
    /// [`E2eError::Timeout`].
    ///
    /// The predicate runs at least once, even with a zero timeout. An `Err`
    /// from the predicate ends the wait immediately; predicates that treat
    /// "not there yet" as a normal state should return `Ok(None)` for it.
    pub async fn until<T, F, Fut>(
        &self,
        condition: impl Into<String>,
        mut predicate: F,
    ) -> E2eResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = E2eResult<Option<T>>>,
    {
        let condition = condition.into();
        let start = Instant::now();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            if let Some(value) = predicate().await? {
                debug!(
                    "Condition '{}' met after {} attempt(s) ({} ms)",
                    condition,
                    attempts,
                    start.elapsed().as_millis()
                );
                return Ok(value);
            }

            let elapsed = start.elapsed();
            if elapsed >= self.timeout {
                return Err(E2eError::Timeout {
                    condition,
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }

            // Don't oversleep past the deadline, but always take one last look.
            sleep(self.poll_interval.min(self.timeout - elapsed)).await;
        }
    }
}

impl Default for Waiter {
    fn default() -> Self {
        Self::from_config(&WaitConfig::default())
    }
}
