//! Fixed-interval retry
//!
//! Every error is retried the same way: no jitter, no backoff growth and no
//! retryable/non-retryable classification. Business statuses are `Ok` values
//! and are never retried.

use std::future::Future;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Bounded retry with a fixed delay between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_ATTEMPTS: u32 = 3;
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

    /// Create a policy; `attempts` is clamped to at least one
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// A policy that tries exactly once
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `op` until it succeeds or the attempts are used up.
    ///
    /// On exhaustion the last error is wrapped in
    /// [`ClientError::RetriesExhausted`].
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= self.attempts => {
                    return Err(ClientError::RetriesExhausted {
                        attempts: self.attempts,
                        source: Box::new(err),
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.attempts,
                        error = %err,
                        "attempt failed, retrying in {:?}",
                        self.delay
                    );
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ATTEMPTS, Self::DEFAULT_DELAY)
    }
}
