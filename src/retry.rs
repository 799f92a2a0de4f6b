use crate::error::FaucetError;
use crate::logging::Logger;
use anyhow::Result;
use rand::Rng;
use std::ops::RangeInclusive;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Whole seconds, inclusive on both ends.
    pub backoff_secs: RangeInclusive<u64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_secs: 5..=10, // Default values - overridden by TOML config in production
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_secs: RangeInclusive<u64>) -> Self {
        Self {
            max_attempts,
            backoff_secs,
        }
    }

    /// Same delay after every failure.
    pub fn fixed(max_attempts: u32, delay_secs: u64) -> Self {
        Self::new(max_attempts, delay_secs..=delay_secs)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

pub async fn execute_with_retry<F, Fut, T, E>(
    operation: F,
    policy: &RetryPolicy,
    label: &str,
    logger: &dyn Logger,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Into<anyhow::Error>,
{
    let max_attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        let err: anyhow::Error = match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => e.into(),
        };

        if is_fatal(&err) {
            logger.error(label, &format!("Not retrying: {}", err));
            return Err(err);
        }

        if attempt >= max_attempts {
            logger.error(
                label,
                &format!("Failed after {} attempts: {}", max_attempts, err),
            );
            return Err(anyhow::anyhow!(
                "{} failed after {} attempts. Last error: {}",
                label,
                max_attempts,
                err
            ));
        }

        let delay = backoff_delay(&policy.backoff_secs);
        logger.warn(
            label,
            &format!(
                "Attempt {}/{} failed: {}. Retrying in {}s",
                attempt,
                max_attempts,
                err,
                delay.as_secs()
            ),
        );
        sleep(delay).await;
        attempt += 1;
    }
}

/// Network mismatches and bad input fail the same way on every attempt.
fn is_fatal(err: &anyhow::Error) -> bool {
    err.downcast_ref::<FaucetError>()
        .is_some_and(|e| !e.is_retryable())
}

/// Draws a delay uniformly from `range`, tolerating a reversed range.
pub fn backoff_delay(range: &RangeInclusive<u64>) -> Duration {
    let (low, high) = if range.start() <= range.end() {
        (*range.start(), *range.end())
    } else {
        (*range.end(), *range.start())
    };
    Duration::from_secs(rand::thread_rng().gen_range(low..=high))
}
