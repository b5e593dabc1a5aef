use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use rand::Rng;
use crate::errors::{OrganizerError, OrganizerResult};
use crate::structs::config::scheduler_config::SchedulerConfig;

const JITTER_MIN: f64 = 0.75;
const JITTER_MAX: f64 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            jitter: true,
        }
    }
}

impl From<&SchedulerConfig> for RetryPolicy {
    fn from(config: &SchedulerConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Un-jittered delay before retry number `attempt + 1`: `min(base * 2^attempt, max)`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay
            .checked_mul(2u32.saturating_pow(attempt))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    fn jittered_delay(&self, attempt: u32) -> Duration {
        let delay = self.backoff_delay(attempt);
        if self.jitter {
            delay.mul_f64(rand::thread_rng().gen_range(JITTER_MIN..=JITTER_MAX))
        } else {
            delay
        }
    }
}

/// Re-runs a fallible async operation with exponential backoff.
///
/// Knows nothing about what the operation does; the caller-supplied predicate decides
/// which errors are worth another attempt.
#[derive(Debug, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
    retries: AtomicU64,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            retries: AtomicU64::new(0),
        }
    }

    /// Retries performed so far across every `execute` call.
    pub fn retry_count(&self) -> u64 {
        self.retries.load(Ordering::Relaxed)
    }

    pub async fn execute<T, F, Fut, P>(&self, label: &str, mut operation: F, is_retryable: P) -> OrganizerResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = OrganizerResult<T>>,
        P: Fn(&OrganizerError) -> bool,
    {
        let mut attempt: u32 = 0;

        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !is_retryable(&error) {
                log::debug!("{label}: not retrying: {error}");
                return Err(error);
            }

            if attempt >= self.policy.max_retries {
                log::error!("❌ {label}: failed after {} attempts: {error}", attempt + 1);
                return Err(OrganizerError::RetriesExhausted {
                    attempts: attempt + 1,
                    last_error: Box::new(error),
                });
            }

            let delay = self.policy.jittered_delay(attempt);
            log::warn!(
                "🔄 {label}: retry {}/{} after {:.2}s due to: {error}",
                attempt + 1,
                self.policy.max_retries,
                delay.as_secs_f64()
            );

            tokio::time::sleep(delay).await;
            self.retries.fetch_add(1, Ordering::Relaxed);
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use tokio::time::Instant;

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            jitter: false,
        }
    }

    #[test]
    fn test_backoff_doubles_until_capped() {
        let delays: Vec<u64> = (0..6).map(|a| policy(3).backoff_delay(a).as_secs()).collect();

        assert_eq!(delays, vec![1, 2, 4, 5, 5, 5]);
        assert_eq!(policy(3).backoff_delay(200), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_are_retried() {
        let executor = RetryExecutor::new(policy(3));
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result = executor
            .execute(
                "flaky",
                || async {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(OrganizerError::transient("llm", "503"))
                    } else {
                        Ok("done")
                    }
                },
                OrganizerError::is_retryable,
            )
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(executor.retry_count(), 2);
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_returns_immediately() {
        let executor = RetryExecutor::new(policy(3));
        let calls = AtomicU32::new(0);

        let result: OrganizerResult<()> = executor
            .execute(
                "quota",
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(OrganizerError::rate_limited("llm", "quota exhausted"))
                },
                OrganizerError::is_retryable,
            )
            .await;

        assert!(matches!(result, Err(OrganizerError::RateLimitExceeded { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(executor.retry_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_wraps_last_error() {
        let executor = RetryExecutor::new(policy(2));

        let result: OrganizerResult<()> = executor
            .execute("down", || async { Err(OrganizerError::transient("github", "502")) }, |_| true)
            .await;

        match result {
            Err(OrganizerError::RetriesExhausted { attempts, last_error }) => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last_error, OrganizerError::Transient { .. }));
            }
            other => panic!("expected exhausted retries, got {other:?}"),
        }
        assert_eq!(executor.retry_count(), 2);
    }

    #[test]
    fn test_jitter_stays_in_band() {
        let jittered = RetryPolicy { jitter: true, ..policy(3) };

        for _ in 0..100 {
            let delay = jittered.jittered_delay(1).as_secs_f64();
            assert!((1.5..=2.5).contains(&delay), "delay {delay} outside jitter band");
        }
    }
}
