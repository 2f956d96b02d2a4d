//! Bounded retry with exponential backoff and mirror rotation.
//!
//! [`retry_rotating`] hands the attempt index to the operation so the caller
//! can pick `endpoints[attempt % len]`. Transient failures are retried after
//! a backoff sleep; anything else is returned at once as
//! [`FetchError::Fatal`].

use std::future::Future;
use std::time::Duration;

use crate::error::{AttemptError, FetchError};

/// Attempt budget and backoff schedule for one query.
///
/// The delay before attempt `i` (`i >= 1`) is `backoff_unit * backoff_base^i`,
/// clamped to `max_delay` when one is set.
///
/// | Attempt | Sleep before (defaults) |
/// |---------|-------------------------|
/// | 0       | none                    |
/// | 1       | 1.6 s                   |
/// | 2       | 2.56 s                  |
/// | 3       | 4.10 s                  |
/// | 4       | 6.55 s                  |
/// | 5       | 10.49 s                 |
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    pub backoff_base: f64,
    pub backoff_unit: Duration,
    pub max_delay: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            backoff_base: 1.6,
            backoff_unit: Duration::from_secs(1),
            max_delay: None,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn from_app_config(config: &opennow_core::AppConfig) -> Self {
        Self {
            max_attempts: config.overpass_max_attempts,
            backoff_base: config.overpass_backoff_base,
            backoff_unit: Duration::from_secs(1),
            max_delay: config.overpass_max_backoff_secs.map(Duration::from_secs),
        }
    }

    /// Sleep to apply before attempt `attempt`. Zero for the first attempt.
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.backoff_unit.as_secs_f64() * self.backoff_base.powi(exponent);
        let delay = Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX);
        match self.max_delay {
            Some(cap) => delay.min(cap),
            None => delay,
        }
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Runs `operation(attempt)` until it succeeds, fails fatally, or the
/// attempt budget is spent.
///
/// On exhaustion the last transient cause is returned inside
/// [`FetchError::Transient`].
pub(crate) async fn retry_rotating<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let max_attempts = policy.attempts();
    let mut attempt = 0u32;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_transient() => {
                tracing::warn!(attempt, error = %err, "non-retriable Overpass error");
                return Err(FetchError::Fatal { cause: err });
            }
            Err(err) => {
                if attempt + 1 >= max_attempts {
                    return Err(FetchError::Transient {
                        attempts: attempt + 1,
                        last: err,
                    });
                }
                attempt += 1;
                let delay = policy.delay_before(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient Overpass error, retrying after backoff"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
