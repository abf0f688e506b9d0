use std::future::Future;
use std::time::Duration;

use versus_core::{AiSettings, CollaboratorError};

/// Timeout and backoff applied around each generator attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub multiplier: f64,
}

impl From<&AiSettings> for RetryPolicy {
    fn from(settings: &AiSettings) -> Self {
        Self {
            timeout: settings.timeout(),
            max_retries: settings.max_retries,
            initial_backoff: Duration::from_millis(settings.initial_backoff_ms),
            max_backoff: Duration::from_millis(settings.max_backoff_ms),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt + 1`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let base = self.initial_backoff.as_millis() as f64 * self.multiplier.powi(attempt as i32);
        let capped = base.min(self.max_backoff.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }
}

/// Run `operation` under the policy's timeout, retrying transient failures with
/// exponential backoff. Permanent failures return immediately.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, operation: F) -> Result<T, CollaboratorError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, CollaboratorError>>,
{
    let mut attempt = 0;
    loop {
        let outcome = match tokio::time::timeout(policy.timeout, operation()).await {
            Ok(outcome) => outcome,
            Err(_) => Err(CollaboratorError::Timeout {
                timeout_secs: policy.timeout.as_secs(),
            }),
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() || attempt >= policy.max_retries => return Err(e),
            Err(e) => {
                let delay = policy.backoff(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max = policy.max_retries,
                    backoff_ms = delay.as_millis() as u64,
                    error = %e,
                    "retrying comparison request"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
