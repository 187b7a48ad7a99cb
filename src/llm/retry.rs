//! Bounded exponential backoff retry for transient model failures.

use std::future::Future;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use tracing::warn;

/// Default number of total attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default wait before the second attempt.
pub const DEFAULT_BASE_BACKOFF: Duration = Duration::from_millis(400);

/// Ceiling for a single wait.
const MAX_INTERVAL: Duration = Duration::from_secs(3600);

/// How many times to try an operation and how long to wait in between.
///
/// Waits double after every failed attempt: `base`, `2 * base`, `4 * base`...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: DEFAULT_BASE_BACKOFF,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_backoff,
        }
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.base_backoff,
            initial_interval: self.base_backoff,
            randomization_factor: 0.0,
            multiplier: 2.0,
            max_interval: MAX_INTERVAL,
            max_elapsed_time: None,
            ..Default::default()
        }
    }

    /// Run `attempt` until it succeeds, fails with an error `is_transient`
    /// rejects, or `max_attempts` calls have been made.
    ///
    /// The last error is returned unchanged. Dropping the returned future
    /// while it sleeps stops further attempts.
    pub async fn run<T, E, Fut, F, P>(&self, mut attempt: F, is_transient: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let mut backoff = self.backoff();
        let mut attempts = 0;

        loop {
            attempts += 1;

            let err = match attempt().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !is_transient(&err) || attempts >= self.max_attempts {
                return Err(err);
            }

            let wait = backoff.next_backoff().unwrap_or(self.base_backoff);
            warn!(
                attempt = attempts,
                max_attempts = self.max_attempts,
                wait_ms = wait.as_millis() as u64,
                "Transient failure, retrying: {}",
                err
            );
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, PartialEq)]
    enum TestError {
        Transient(String),
        Fatal(String),
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{self:?}")
        }
    }

    fn transient(e: &TestError) -> bool {
        matches!(e, TestError::Transient(_))
    }

    #[test]
    fn test_backoff_doubles_without_jitter() {
        let policy = RetryPolicy::new(3, Duration::from_millis(400));
        let mut backoff = policy.backoff();
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(400)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(800)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(1600)));
    }

    #[test]
    fn test_zero_attempts_is_raised_to_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_succeeds_on_first_attempt() {
        let result: Result<&str, TestError> = RetryPolicy::default()
            .run(|| async { Ok("ok") }, transient)
            .await;
        assert_eq!(result.unwrap(), "ok");
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_succeeds_after_two_transient_failures() {
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = count.clone();
        let started = tokio::time::Instant::now();

        let result: Result<&str, TestError> = RetryPolicy::default()
            .run(
                move || {
                    let c = count_clone.clone();
                    async move {
                        let n = c.fetch_add(1, Ordering::SeqCst);
                        if n < 2 {
                            Err(TestError::Transient("refused".to_string()))
                        } else {
                            Ok("recovered")
                        }
                    }
                },
                transient,
            )
            .await;

        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(count.load(Ordering::SeqCst), 3);
        // 400ms + 800ms
        assert_eq!(started.elapsed(), Duration::from_millis(1200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_transient_failure_is_not_retried() {
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = count.clone();

        let result: Result<(), TestError> = RetryPolicy::default()
            .run(
                move || {
                    let c = count_clone.clone();
                    async move {
                        c.fetch_add(1, Ordering::SeqCst);
                        Err(TestError::Fatal("model not found".to_string()))
                    }
                },
                transient,
            )
            .await;

        assert_eq!(result, Err(TestError::Fatal("model not found".to_string())));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhausts_and_returns_last_error() {
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = count.clone();

        let result: Result<(), TestError> = RetryPolicy::default()
            .run(
                move || {
                    let c = count_clone.clone();
                    async move {
                        let n = c.fetch_add(1, Ordering::SeqCst);
                        Err(TestError::Transient(format!("timeout {n}")))
                    }
                },
                transient,
            )
            .await;

        assert_eq!(result, Err(TestError::Transient("timeout 2".to_string())));
        assert_eq!(count.load(Ordering::SeqCst), DEFAULT_MAX_ATTEMPTS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_future_stops_retries() {
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = count.clone();

        let policy = RetryPolicy::new(5, Duration::from_secs(10));
        let run = policy.run(
            move || {
                let c = count_clone.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(TestError::Transient("refused".to_string()))
                }
            },
            transient,
        );

        let outcome = tokio::time::timeout(Duration::from_secs(1), run).await;
        assert!(outcome.is_err());
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
