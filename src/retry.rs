//! Retry with exponential backoff, honoring a cancellation token.

use crate::classifier::{Classifier, ErrorClass};
use crate::codec::Operation;
use crate::error::{ApiError, Error};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Value returned by a successful execution, with the number of attempts it took
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retried<T> {
    pub value: T,
    pub attempts: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Ceiling of the exponential backoff
    pub max_delay: Duration,
    /// When not set, only failures that happened before any response was received are retried
    pub idempotent: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            idempotent: true,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            ..Default::default()
        }
    }

    /// A policy trying only once
    pub fn never() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn with_max_attempts(mut self, value: u32) -> Self {
        self.max_attempts = value;
        self
    }

    pub fn with_base_delay(mut self, value: Duration) -> Self {
        self.base_delay = value;
        self
    }

    pub fn with_max_delay(mut self, value: Duration) -> Self {
        self.max_delay = value;
        self
    }

    pub fn with_idempotent(mut self, value: bool) -> Self {
        self.idempotent = value;
        self
    }

    /// Delay to wait after the given failed attempt, starting at 1
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    fn should_retry(&self, class: ErrorClass, error: &Error) -> bool {
        if !class.is_retryable() {
            false
        } else if self.idempotent {
            true
        } else {
            matches!(error, Error::Transport(inner) if inner.is_before_response())
        }
    }

    /// Executes the operation until it succeeds, fails with an error that should not be retried
    /// or runs out of attempts.
    ///
    /// Each attempt and each backoff sleep is abandoned as soon as `cancel` is triggered.
    #[tracing::instrument(name = "retry", skip_all, fields(operation = %operation))]
    pub async fn execute<T, F, Fut>(
        &self,
        operation: Operation,
        classifier: &Classifier,
        cancel: &CancellationToken,
        mut attempt_fn: F,
    ) -> Result<Retried<T>, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let cancelled = |attempts: u32| ApiError {
            operation,
            class: None,
            attempts,
            source: Error::Cancelled,
        };

        let mut attempt = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(cancelled(attempt));
            }
            attempt += 1;
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(attempt)),
                result = attempt_fn() => result,
            };
            let error = match result {
                Ok(value) => {
                    return Ok(Retried {
                        value,
                        attempts: attempt,
                    })
                }
                Err(error) => error,
            };

            let class = classifier.classify_error(&error);
            let retry = attempt < max_attempts
                && class.map_or(false, |class| self.should_retry(class, &error));
            if !retry {
                tracing::debug!(attempt, ?class, "giving up: {error}");
                return Err(ApiError {
                    operation,
                    class,
                    attempts: attempt,
                    source: error,
                });
            }

            let delay = self.delay(attempt);
            tracing::warn!(
                attempt,
                class = ?class,
                delay_ms = delay.as_millis() as u64,
                "attempt failed: {error}"
            );
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(attempt)),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RemoteError, TransportError};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy() -> RetryPolicy {
        RetryPolicy::new(5, Duration::from_millis(1)).with_max_delay(Duration::from_millis(4))
    }

    fn remote(message: &str) -> Error {
        Error::Remote(RemoteError::new("KO", message))
    }

    #[test]
    fn delay_should_grow_exponentially_until_ceiling() {
        let policy = RetryPolicy::new(10, Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(1000));
        assert_eq!(policy.delay(1), Duration::from_millis(100));
        assert_eq!(policy.delay(2), Duration::from_millis(200));
        assert_eq!(policy.delay(3), Duration::from_millis(400));
        assert_eq!(policy.delay(4), Duration::from_millis(800));
        assert_eq!(policy.delay(5), Duration::from_millis(1000));
        assert_eq!(policy.delay(200), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn should_succeed_after_transient_failures() {
        crate::tests::init();
        let calls = &AtomicU32::new(0);
        let result = policy()
            .execute(
                Operation::ListFolders,
                &Classifier::default(),
                &CancellationToken::new(),
                move || async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(remote("Service temporarily unavailable"))
                    } else {
                        Ok(42)
                    }
                },
            )
            .await
            .unwrap();
        assert_eq!(result, Retried { value: 42, attempts: 3 });
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn should_not_retry_auth_failure() {
        crate::tests::init();
        let calls = &AtomicU32::new(0);
        let err = policy()
            .execute(
                Operation::ListFiles,
                &Classifier::default(),
                &CancellationToken::new(),
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(remote("Not authenticated #247"))
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.attempts, 1);
        assert_eq!(err.class, Some(ErrorClass::AuthFailed));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn should_report_exhausted_attempts() {
        crate::tests::init();
        let err = policy()
            .with_max_attempts(3)
            .execute(
                Operation::ListFiles,
                &Classifier::default(),
                &CancellationToken::new(),
                move || async move { Err::<(), _>(remote("Flood detected")) },
            )
            .await
            .unwrap_err();
        assert_eq!(err.attempts, 3);
        assert_eq!(err.class, Some(ErrorClass::RateLimited));
        assert_eq!(err.as_remote().unwrap().message, "Flood detected");
    }

    #[tokio::test]
    async fn non_idempotent_should_only_retry_before_response() {
        crate::tests::init();
        let policy = policy().with_idempotent(false);
        let classifier = Classifier::default();
        let cancel = CancellationToken::new();

        let calls = &AtomicU32::new(0);
        let err = policy
            .execute(Operation::MakeFolder, &classifier, &cancel, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(remote("Internal server error"))
            })
            .await
            .unwrap_err();
        assert_eq!(err.attempts, 1);
        assert_eq!(err.class, Some(ErrorClass::Transient));

        let calls = &AtomicU32::new(0);
        let result = policy
            .execute(Operation::MakeFolder, &classifier, &cancel, move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(Error::Transport(TransportError::Connect("refused".into())))
                } else {
                    Ok("created")
                }
            })
            .await
            .unwrap();
        assert_eq!(result.attempts, 2);

        let err = policy
            .execute(Operation::MakeFolder, &classifier, &cancel, move || async move {
                Err::<(), _>(Error::Transport(TransportError::Body("reset".into())))
            })
            .await
            .unwrap_err();
        assert_eq!(err.attempts, 1);
    }

    #[tokio::test]
    async fn should_stop_when_cancelled_during_backoff() {
        crate::tests::init();
        let cancel = CancellationToken::new();
        let token = &cancel;
        let calls = &AtomicU32::new(0);
        let err = RetryPolicy::new(5, Duration::from_secs(3600))
            .execute(
                Operation::ListFolders,
                &Classifier::default(),
                &cancel,
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    token.cancel();
                    Err::<(), _>(remote("try again"))
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(err.class, None);
        assert_eq!(err.attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn should_stop_when_cancelled_while_sleeping() {
        crate::tests::init();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });
        let calls = &AtomicU32::new(0);
        let started = tokio::time::Instant::now();
        let err = RetryPolicy::new(5, Duration::from_secs(3600))
            .execute(
                Operation::ListFolders,
                &Classifier::default(),
                &cancel,
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(remote("try again"))
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(err.attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_secs(60));
    }

    #[tokio::test]
    async fn should_stop_when_cancelled_during_attempt() {
        crate::tests::init();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });
        let err = policy()
            .execute(
                Operation::ListFolders,
                &Classifier::default(),
                &cancel,
                move || async move {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(())
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(err.attempts, 1);
    }

    #[tokio::test]
    async fn should_not_start_when_already_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = policy()
            .execute(
                Operation::ListFolders,
                &Classifier::default(),
                &cancel,
                move || async move { Ok(()) },
            )
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(err.attempts, 0);
    }
}
