//! Retry with exponential backoff for the external model call.
//!
//! The backoff wait uses `tokio::time::sleep`, so it suspends the calling
//! task without blocking a worker thread; other requests keep being served
//! while a retry sequence waits.

use crate::error::InferenceError;
use std::future::Future;
use std::time::Duration;

/// Bounds for the retry loop.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total call attempts, including the first (must be >= 1)
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent retry
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 1000,
        }
    }
}

/// Calculate the backoff duration after `retries` completed retries.
///
/// The wait before retry *n* (0-indexed) is `base_delay_ms * 2^n`, capped at
/// 30 seconds. Equivalently, the delay before 1-indexed attempt *k* (k >= 2)
/// is `base_delay_ms * 2^(k-2)`.
pub fn backoff_delay(retries: u32, base_delay_ms: u64) -> Duration {
    let delay = base_delay_ms.saturating_mul(2u64.saturating_pow(retries));
    Duration::from_millis(delay.min(30_000))
}

/// Invoke `thunk` until it succeeds, the error is permanent, or
/// `policy.max_attempts` attempts have failed.
///
/// The final error is propagated unchanged. Permanent errors (per
/// [`InferenceError::is_transient`]) are never retried. Every retry emits a
/// warning with the attempt number and computed delay.
pub async fn call_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    mut thunk: F,
) -> std::result::Result<T, InferenceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, InferenceError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        match thunk().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt == max_attempts || !error.is_transient() {
                    return Err(error);
                }
                let delay = backoff_delay(attempt - 1, policy.base_delay_ms);
                tracing::warn!(
                    "Retrying inference (attempt {attempt}/{max_attempts}) after {}ms: {error}",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
