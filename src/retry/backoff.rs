//! Backoff crate-based retry executor.
//!
//! Wraps `backoff::ExponentialBackoff` so callers get the same randomized
//! exponential backoff behavior the ecosystem uses, while still honoring
//! `AssessError::is_retryable` for transient/permanent classification.

use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use backoff::future::retry;

use crate::error::AssessError;

/// Retry executor backed by the `backoff` crate.
#[derive(Debug, Clone)]
pub struct BackoffRetryExecutor {
    initial_interval: Duration,
    max_interval: Duration,
    max_elapsed_time: Option<Duration>,
    multiplier: f64,
}

impl Default for BackoffRetryExecutor {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(30),
            max_elapsed_time: Some(Duration::from_secs(120)),
            multiplier: 2.0,
        }
    }
}

impl BackoffRetryExecutor {
    /// Create an executor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial retry interval.
    pub const fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        self
    }

    /// Set the maximum retry interval.
    pub const fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    /// Set the total retry budget. `None` retries until success.
    pub const fn with_max_elapsed_time(mut self, elapsed: Option<Duration>) -> Self {
        self.max_elapsed_time = elapsed;
        self
    }

    /// Set the backoff multiplier.
    pub const fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Execute an operation with exponential backoff.
    ///
    /// Non-retryable errors abort immediately; retryable ones are retried
    /// until the elapsed-time budget runs out.
    pub async fn execute<F, Fut, T>(&self, operation: F) -> Result<T, AssessError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, AssessError>>,
    {
        let backoff = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_interval)
            .with_max_interval(self.max_interval)
            .with_max_elapsed_time(self.max_elapsed_time)
            .with_multiplier(self.multiplier)
            .build();

        retry(backoff, || async {
            operation().await.map_err(|error| {
                if error.is_retryable() {
                    tracing::debug!(%error, "transient assessment error, backing off");
                    backoff::Error::transient(error)
                } else {
                    backoff::Error::permanent(error)
                }
            })
        })
        .await
    }
}

/// Retry an operation with the default backoff executor.
pub async fn retry_with_backoff<F, Fut, T>(operation: F) -> Result<T, AssessError>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<T, AssessError>> + Send,
    T: Send,
{
    BackoffRetryExecutor::default().execute(operation).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn transient_error_is_retried() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let executor = BackoffRetryExecutor::new()
            .with_initial_interval(Duration::from_millis(1))
            .with_max_elapsed_time(Some(Duration::from_secs(2)));

        let result = executor
            .execute(|| {
                let attempts = attempts_clone.clone();
                async move {
                    if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(AssessError::api_error(503, "warming up"))
                    } else {
                        Ok(42u32)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn permanent_error_aborts() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let executor = BackoffRetryExecutor::new()
            .with_initial_interval(Duration::from_millis(1))
            .with_max_elapsed_time(Some(Duration::from_secs(2)));

        let result: Result<(), AssessError> = executor
            .execute(|| {
                let attempts = attempts_clone.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(AssessError::AuthenticationError("bad key".into()))
                }
            })
            .await;

        assert!(matches!(result, Err(AssessError::AuthenticationError(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
