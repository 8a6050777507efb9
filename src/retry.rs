// src/retry.rs
use crate::config::RetryConfig;
use crate::error::ScrapeError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Bounded-attempt wrapper around one adapter operation. On exhaustion the
/// caller's fallback producer supplies the result instead of the error
/// propagating - no single-source failure crosses this boundary.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.delay_ms))
    }

    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, ScrapeError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ScrapeError>>,
    {
        let mut last_error = None;
        for attempt in 1..=self.max_attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    warn!(
                        "'{}' attempt {}/{} failed: {}",
                        label, attempt, self.max_attempts, error
                    );
                    last_error = Some(error);
                    if attempt < self.max_attempts {
                        sleep(self.delay).await;
                    }
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            ScrapeError::AutomationUnavailable(format!("'{label}' ran zero attempts"))
        }))
    }

    /// Run with retries; on exhaustion invoke `fallback` and report the
    /// final error alongside its product so callers can flag the outcome.
    pub async fn run_with_fallback<T, F, Fut, FB>(
        &self,
        label: &str,
        op: F,
        fallback: FB,
    ) -> (T, Option<ScrapeError>)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ScrapeError>>,
        FB: FnOnce() -> T,
    {
        match self.run(label, op).await {
            Ok(value) => (value, None),
            Err(error) => {
                warn!("'{}' retries exhausted, using fallback: {}", label, error);
                (fallback(), Some(error))
            }
        }
    }
}
