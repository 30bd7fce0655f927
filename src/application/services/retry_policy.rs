use std::future::Future;
use std::time::Duration;

use crate::application::ports::AiClientError;

use super::ServiceError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_BASE: f64 = 1.5;
const MAX_BACKOFF_SECS: f64 = 300.0;

/// Bounded retry with exponential backoff, applied only to rate-limit errors.
///
/// Every other error fails on first occurrence. Once attempts run out the last
/// rate-limit error is wrapped in [`ServiceError::RequestFailed`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, backoff_base: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait before the attempt following the zero-based `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.backoff_base.powi(exponent).max(0.0).min(MAX_BACKOFF_SECS);
        Duration::from_secs_f64(secs)
    }

    pub async fn execute<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, ServiceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AiClientError>>,
    {
        let mut attempt = 0;
        loop {
            let error = match call().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            let attempts = attempt + 1;
            if !error.is_rate_limited() || attempts >= self.max_attempts {
                tracing::error!(operation, attempts, error = %error, "Remote call failed");
                return Err(ServiceError::RequestFailed {
                    operation: operation.to_string(),
                    attempts,
                    source: error,
                });
            }

            let delay = self.delay_for(attempt);
            tracing::warn!(
                operation,
                attempt = attempts,
                delay_secs = delay.as_secs_f64(),
                "Rate limited, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
