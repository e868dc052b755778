//! Retry with exponential backoff.
//!
//! The media CDN answers bursts with HTTP 420 ("Enhance Your Calm"). Upload
//! and transformation calls are wrapped in [`retry_with_backoff`] with
//! [`is_rate_limited`] as the retry predicate.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use imaginify_config::RetryConfig;
use imaginify_core::defaults;
use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Backoff parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    pub multiplier: f64,
    /// Delays are scaled by a random factor in `1 ± jitter`.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::DEFAULT_RETRY_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(defaults::DEFAULT_RETRY_BASE_DELAY_MS),
            max_delay: Duration::from_millis(defaults::DEFAULT_RETRY_MAX_DELAY_MS),
            multiplier: defaults::DEFAULT_RETRY_MULTIPLIER,
            jitter: defaults::DEFAULT_RETRY_JITTER,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts,
            base_delay: Duration::from_millis(cfg.base_delay_ms),
            max_delay: Duration::from_millis(cfg.max_delay_ms),
            multiplier: cfg.multiplier,
            jitter: cfg.jitter,
        }
    }
}

impl RetryPolicy {
    /// Un-jittered delay after the `retry`-th failure (0-based):
    /// `min(base_delay * multiplier^retry, max_delay)`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exp = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self.base_delay.as_secs_f64() * self.multiplier.powi(exp);
        Duration::try_from_secs_f64(secs.min(self.max_delay.as_secs_f64()))
            .unwrap_or(self.max_delay)
    }
}

/// Why a retried operation gave up.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// The error was not retryable; returned after a single attempt.
    #[error("{0}")]
    Permanent(E),
    /// Every attempt failed with a retryable error.
    #[error("max retries exceeded after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },
    /// The cancellation token fired.
    #[error("retry cancelled")]
    Cancelled,
}

impl<E> RetryError<E> {
    /// The last error seen, if any attempt completed.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Permanent(e) | Self::Exhausted { last: e, .. } => Some(e),
            Self::Cancelled => None,
        }
    }
}

/// Whether an upstream failure is the CDN's rate-limit signal.
pub fn is_rate_limited(status: Option<u16>, message: &str) -> bool {
    status == Some(defaults::RATE_LIMIT_HTTP_STATUS)
        || message.contains("420")
        || message.contains("Enhance Your Calm")
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// `policy.max_attempts` attempts have failed.
///
/// # Example
///
/// ```ignore
/// let policy = RetryPolicy::default();
/// let asset = retry_with_backoff(&policy, |e: &UploadError| is_rate_limited(e.status, &e.message), || {
///     client.upload(&bytes)
/// })
/// .await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E, P>(
    policy: &RetryPolicy,
    is_retryable: P,
    operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: fmt::Display,
{
    run(policy, None, is_retryable, operation).await
}

/// Like [`retry_with_backoff`], but gives up with [`RetryError::Cancelled`]
/// as soon as `token` fires, whether during an attempt or a backoff sleep.
/// The in-flight attempt is dropped.
pub async fn retry_with_backoff_cancellable<F, Fut, T, E, P>(
    policy: &RetryPolicy,
    token: &CancellationToken,
    is_retryable: P,
    operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: fmt::Display,
{
    run(policy, Some(token), is_retryable, operation).await
}

async fn run<F, Fut, T, E, P>(
    policy: &RetryPolicy,
    token: Option<&CancellationToken>,
    is_retryable: P,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: fmt::Display,
{
    if token.is_some_and(CancellationToken::is_cancelled) {
        return Err(RetryError::Cancelled);
    }

    let max_attempts = policy.max_attempts.max(1);
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        let result = match token {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => return Err(RetryError::Cancelled),
                result = operation() => result,
            },
            None => operation().await,
        };

        let err = match result {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retryable(&err) {
            return Err(RetryError::Permanent(err));
        }
        if attempt >= max_attempts {
            warn!(attempts = attempt, error = %err, "max retries exceeded");
            return Err(RetryError::Exhausted {
                attempts: attempt,
                last: err,
            });
        }

        let delay = apply_jitter(policy.delay_for(attempt - 1), policy.jitter);
        debug!(
            attempt,
            max_attempts,
            backoff_ms = delay.as_millis() as u64,
            error = %err,
            "rate limited, retrying after backoff"
        );

        match token {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => return Err(RetryError::Cancelled),
                () = tokio::time::sleep(delay) => {}
            },
            None => tokio::time::sleep(delay).await,
        }
    }
}

/// Scale `dur` by a random factor in `[1 - factor, 1 + factor]`.
fn apply_jitter(dur: Duration, factor: f64) -> Duration {
    if factor <= 0.0 || dur.is_zero() {
        return dur;
    }

    let factor = factor.clamp(0.0, 1.0);
    let base_nanos = dur.as_nanos() as f64;
    let jittered = rand::rng().random_range(base_nanos * (1.0 - factor)..=base_nanos * (1.0 + factor));
    Duration::from_nanos(jittered as u64)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::time::Instant;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct CdnError {
        status: u16,
        message: &'static str,
    }

    impl fmt::Display for CdnError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{} {}", self.status, self.message)
        }
    }

    fn rate_limited() -> CdnError {
        CdnError {
            status: 420,
            message: "Enhance Your Calm",
        }
    }

    fn retryable(e: &CdnError) -> bool {
        is_rate_limited(Some(e.status), e.message)
    }

    #[test]
    fn delay_grows_and_caps() {
        let policy = RetryPolicy {
            max_delay: Duration::from_millis(3000),
            ..Default::default()
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(3000));
        assert_eq!(policy.delay_for(40), Duration::from_millis(3000));
    }

    #[test]
    fn jitter_stays_in_bounds() {
        let base = Duration::from_millis(1000);
        assert_eq!(apply_jitter(base, 0.0), base);
        for _ in 0..100 {
            let d = apply_jitter(base, 0.25);
            assert!(d >= Duration::from_millis(750) && d <= Duration::from_millis(1250));
        }
    }

    #[test]
    fn rate_limit_detection() {
        assert!(is_rate_limited(Some(420), ""));
        assert!(is_rate_limited(None, "Error: 420 Enhance Your Calm"));
        assert!(is_rate_limited(None, "Enhance Your Calm"));
        assert!(!is_rate_limited(Some(500), "Internal Server Error"));
    }

    #[test]
    fn policy_from_config() {
        let cfg = RetryConfig {
            max_attempts: 5,
            base_delay_ms: 200,
            ..Default::default()
        };
        let policy = RetryPolicy::from(&cfg);
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay, Duration::from_millis(200));
        assert_eq!(policy.max_delay, Duration::from_millis(30_000));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_rate_limit() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let result = retry_with_backoff(&RetryPolicy::default(), retryable, || {
            let calls = Arc::clone(&calls);
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(rate_limited())
                } else {
                    Ok("uploaded")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "uploaded");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 1s + 2s of backoff
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(3000) && elapsed < Duration::from_millis(3100));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: Result<(), _> = retry_with_backoff(&RetryPolicy::default(), retryable, || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(rate_limited())
            }
        })
        .await;

        match result {
            Err(RetryError::Exhausted { attempts, last }) => {
                assert_eq!(attempts, 3);
                assert_eq!(last, rate_limited());
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_error_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();
        let result: Result<(), _> = retry_with_backoff(&RetryPolicy::default(), retryable, || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(CdnError {
                    status: 400,
                    message: "Invalid image file",
                })
            }
        })
        .await;

        assert!(matches!(result, Err(RetryError::Permanent(ref e)) if e.status == 400));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_backoff() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            canceller.cancel();
        });

        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();
        let result: Result<(), _> =
            retry_with_backoff_cancellable(&RetryPolicy::default(), &token, retryable, || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(rate_limited())
                }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(start.elapsed() < Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn already_cancelled_never_runs() {
        let token = CancellationToken::new();
        token.cancel();
        let calls = AtomicU32::new(0);

        let result: Result<(), RetryError<CdnError>> =
            retry_with_backoff_cancellable(&RetryPolicy::default(), &token, retryable, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(RetryError::<CdnError>::Cancelled.into_inner().is_none());
    }
}
