//! Reusable retry policy with exponential backoff and jitter.
//!
//! The policy is a decorator: [`run`] wraps any fallible async operation and
//! re-invokes it according to a [`RetryConfig`]. Which failures are worth
//! retrying is part of the configuration ([`RetryConfig::retry_on`]), not
//! hard-coded into the loop; errors describe themselves through the
//! [`RetryableError`] trait.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

/// Coarse classification of errors for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Connection failures, timeouts, retryable HTTP server statuses.
    Transport,
    /// HTTP 429 responses.
    RateLimit,
    /// Errors reported inside an otherwise well-formed response envelope.
    Server,
}

/// An error that can describe itself to the retry loop.
pub trait RetryableError {
    /// The retry class of this error, or `None` if it never warrants a retry.
    fn class(&self) -> Option<ErrorClass>;

    /// A server-provided wait hint (e.g. from a Retry-After header).
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl RetryableError for crate::Error {
    fn class(&self) -> Option<ErrorClass> {
        self.kind.class()
    }

    fn retry_after(&self) -> Option<Duration> {
        self.kind.retry_after()
    }
}

/// Configuration for retry behavior.
///
/// `tries` counts total attempts: `1` means a single attempt with no retry.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts, including the first.
    pub tries: u32,
    /// Initial delay before the first retry.
    pub base_interval: Duration,
    /// Maximum delay between retries.
    pub max_interval: Duration,
    /// Backoff strategy to use.
    pub backoff: BackoffStrategy,
    /// Which error classes trigger a retry.
    pub retry_on: Vec<ErrorClass>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            tries: 3,
            base_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(30),
            backoff: BackoffStrategy::ExponentialWithJitter { factor: 2.0 },
            retry_on: vec![ErrorClass::Transport, ErrorClass::RateLimit],
        }
    }
}

impl RetryConfig {
    /// A config that performs exactly one attempt.
    pub fn single_attempt() -> Self {
        Self {
            tries: 1,
            ..Default::default()
        }
    }

    /// Set the total number of attempts.
    pub fn with_tries(mut self, tries: u32) -> Self {
        self.tries = tries.max(1);
        self
    }

    /// Set the initial retry delay.
    pub fn with_base_interval(mut self, interval: Duration) -> Self {
        self.base_interval = interval;
        self
    }

    /// Set the maximum retry delay.
    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    /// Set the backoff strategy.
    pub fn with_backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Set which error classes trigger a retry.
    pub fn with_retry_on(mut self, classes: Vec<ErrorClass>) -> Self {
        self.retry_on = classes;
        self
    }

    /// Returns true if the given error class is configured as retryable.
    pub fn retries_on(&self, class: ErrorClass) -> bool {
        self.retry_on.contains(&class)
    }
}

/// Per-service retry knob, resolved into a [`RetryConfig`].
///
/// Mirrors the three accepted shapes: disabled, enabled with mechanism
/// defaults, or an explicit record of overrides merged over the defaults.
#[derive(Debug, Clone, Default)]
pub enum Retriable {
    /// No retries: exactly one attempt.
    #[default]
    Off,
    /// Retry with the mechanism's built-in defaults.
    Defaults,
    /// Retry with explicit overrides merged over the defaults.
    Custom(RetryOverrides),
}

impl Retriable {
    /// Resolve this knob into a concrete retry configuration.
    pub fn resolve(&self) -> RetryConfig {
        match self {
            Retriable::Off => RetryConfig::single_attempt(),
            Retriable::Defaults => RetryConfig::default(),
            Retriable::Custom(overrides) => overrides.apply(RetryConfig::default()),
        }
    }
}

impl From<bool> for Retriable {
    fn from(enabled: bool) -> Self {
        if enabled {
            Retriable::Defaults
        } else {
            Retriable::Off
        }
    }
}

impl From<RetryOverrides> for Retriable {
    fn from(overrides: RetryOverrides) -> Self {
        Retriable::Custom(overrides)
    }
}

/// Explicit retry overrides; unset fields keep the default value.
#[derive(Debug, Clone, Default)]
pub struct RetryOverrides {
    /// Total number of attempts.
    pub tries: Option<u32>,
    /// Initial retry delay.
    pub base_interval: Option<Duration>,
    /// Maximum retry delay.
    pub max_interval: Option<Duration>,
    /// Which error classes trigger a retry.
    pub retry_on: Option<Vec<ErrorClass>>,
}

impl RetryOverrides {
    /// Overrides with only `tries` set.
    pub fn tries(tries: u32) -> Self {
        Self {
            tries: Some(tries),
            ..Default::default()
        }
    }

    fn apply(&self, mut config: RetryConfig) -> RetryConfig {
        if let Some(tries) = self.tries {
            config.tries = tries.max(1);
        }
        if let Some(base) = self.base_interval {
            config.base_interval = base;
        }
        if let Some(max) = self.max_interval {
            config.max_interval = max;
        }
        if let Some(ref retry_on) = self.retry_on {
            config.retry_on = retry_on.clone();
        }
        config
    }
}

/// Backoff strategy for determining retry delays.
#[derive(Debug, Clone, Copy)]
pub enum BackoffStrategy {
    /// Constant delay between retries.
    Constant,
    /// Linear increase in delay (delay * attempt).
    Linear,
    /// Exponential increase in delay (delay * factor^attempt).
    Exponential { factor: f64 },
    /// Exponential with random jitter to avoid thundering herd.
    ExponentialWithJitter { factor: f64 },
}

impl BackoffStrategy {
    /// Calculate the delay for a given attempt number (0-indexed).
    pub fn delay(&self, attempt: u32, base_interval: Duration, max_interval: Duration) -> Duration {
        let delay = match self {
            BackoffStrategy::Constant => base_interval,
            BackoffStrategy::Linear => base_interval * (attempt + 1),
            BackoffStrategy::Exponential { factor } => {
                let multiplier = factor.powi(attempt as i32);
                Duration::from_secs_f64(base_interval.as_secs_f64() * multiplier)
            }
            BackoffStrategy::ExponentialWithJitter { factor } => {
                let base_multiplier = factor.powi(attempt as i32);
                let base_delay = base_interval.as_secs_f64() * base_multiplier;

                // Random value between 0 and base_delay on top of the base
                let jitter = rand::rng().random::<f64>() * base_delay;

                Duration::from_secs_f64(base_delay + jitter)
            }
        };

        std::cmp::min(delay, max_interval)
    }
}

/// Retry policy that tracks attempts against a [`RetryConfig`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    attempt: u32,
}

impl RetryPolicy {
    /// Create a new retry policy from config.
    pub fn new(config: RetryConfig) -> Self {
        Self { config, attempt: 0 }
    }

    /// Returns the number of failed attempts recorded so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Returns true if another attempt is allowed after a failure.
    pub fn should_retry(&self) -> bool {
        self.attempt + 1 < self.config.tries
    }

    /// Record a failed attempt and return the delay before the next one.
    /// Returns None once the attempt budget is exhausted.
    pub fn next_delay(&mut self, retry_after: Option<Duration>) -> Option<Duration> {
        if !self.should_retry() {
            return None;
        }

        let delay = match retry_after {
            // A server wait hint wins over the schedule, capped at max.
            Some(hint) => std::cmp::min(hint, self.config.max_interval),
            None => self.config.backoff.delay(
                self.attempt,
                self.config.base_interval,
                self.config.max_interval,
            ),
        };

        self.attempt += 1;
        Some(delay)
    }

    /// Reset the retry policy for a new request.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}

/// Run a fallible async operation under the given retry configuration.
///
/// Re-invokes the operation while its error is of a configured retryable
/// class and the attempt budget allows, sleeping the backoff delay between
/// attempts. Once the budget is exhausted (or the error is not retryable),
/// the last error is returned unchanged.
pub async fn run<T, E, F, Fut>(config: &RetryConfig, mut op: F) -> std::result::Result<T, E>
where
    E: RetryableError + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    let mut policy = RetryPolicy::new(config.clone());

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let retryable = err.class().is_some_and(|c| config.retries_on(c));
                if retryable {
                    if let Some(delay) = policy.next_delay(err.retry_after()) {
                        warn!(
                            attempt = policy.attempt(),
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "attempt failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                }
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, ErrorKind};
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_default_config() {
        let config = RetryConfig::default();
        assert_eq!(config.tries, 3);
        assert_eq!(config.base_interval, Duration::from_millis(500));
        assert!(config.retries_on(ErrorClass::Transport));
        assert!(config.retries_on(ErrorClass::RateLimit));
        assert!(!config.retries_on(ErrorClass::Server));
    }

    #[test]
    fn test_single_attempt() {
        let policy = RetryPolicy::new(RetryConfig::single_attempt());
        assert!(!policy.should_retry());
    }

    #[test]
    fn test_retriable_resolution() {
        // Absent / disabled: exactly one attempt.
        assert_eq!(Retriable::default().resolve().tries, 1);
        assert_eq!(Retriable::from(false).resolve().tries, 1);

        // Enabled with no overrides: mechanism defaults, must not force 1.
        let resolved = Retriable::from(true).resolve();
        assert!(resolved.tries > 1);
        assert_eq!(resolved.tries, RetryConfig::default().tries);

        // Explicit record: overridden fields win, the rest stay defaulted.
        let resolved = Retriable::Custom(RetryOverrides::tries(3)).resolve();
        assert_eq!(resolved.tries, 3);
        assert_eq!(resolved.base_interval, RetryConfig::default().base_interval);
        assert_eq!(resolved.max_interval, RetryConfig::default().max_interval);

        let resolved = Retriable::Custom(RetryOverrides {
            tries: Some(5),
            base_interval: Some(Duration::from_millis(10)),
            retry_on: Some(vec![ErrorClass::Server]),
            ..Default::default()
        })
        .resolve();
        assert_eq!(resolved.tries, 5);
        assert_eq!(resolved.base_interval, Duration::from_millis(10));
        assert!(resolved.retries_on(ErrorClass::Server));
        assert!(!resolved.retries_on(ErrorClass::Transport));
    }

    #[test]
    fn test_constant_backoff() {
        let delay =
            BackoffStrategy::Constant.delay(0, Duration::from_secs(1), Duration::from_secs(60));
        assert_eq!(delay, Duration::from_secs(1));

        let delay =
            BackoffStrategy::Constant.delay(5, Duration::from_secs(1), Duration::from_secs(60));
        assert_eq!(delay, Duration::from_secs(1));
    }

    #[test]
    fn test_exponential_backoff() {
        let strategy = BackoffStrategy::Exponential { factor: 2.0 };
        let base = Duration::from_secs(1);
        let max = Duration::from_secs(60);

        assert_eq!(strategy.delay(0, base, max), Duration::from_secs(1));
        assert_eq!(strategy.delay(1, base, max), Duration::from_secs(2));
        assert_eq!(strategy.delay(2, base, max), Duration::from_secs(4));
        assert_eq!(strategy.delay(3, base, max), Duration::from_secs(8));

        // Should cap at max
        assert_eq!(strategy.delay(10, base, max), Duration::from_secs(60));
    }

    #[test]
    fn test_exponential_with_jitter() {
        let strategy = BackoffStrategy::ExponentialWithJitter { factor: 2.0 };
        let base = Duration::from_secs(1);
        let max = Duration::from_secs(60);

        // With jitter, delay is between base and 2*base
        let delay = strategy.delay(0, base, max);
        assert!(delay >= Duration::from_secs(1));
        assert!(delay <= Duration::from_secs(2));

        let delay = strategy.delay(1, base, max);
        assert!(delay >= Duration::from_secs(2));
        assert!(delay <= Duration::from_secs(4));
    }

    #[test]
    fn test_retry_policy_bookkeeping() {
        let config = RetryConfig::default().with_tries(3);
        let mut policy = RetryPolicy::new(config);

        assert!(policy.should_retry());
        assert_eq!(policy.attempt(), 0);

        let delay1 = policy.next_delay(None).unwrap();
        assert_eq!(policy.attempt(), 1);
        assert!(policy.should_retry());

        let delay2 = policy.next_delay(None).unwrap();
        assert_eq!(policy.attempt(), 2);
        assert!(!policy.should_retry());

        assert!(delay1 > Duration::ZERO);
        assert!(delay2 > Duration::ZERO);

        // Two retries consumed: three attempts total, budget spent.
        assert!(policy.next_delay(None).is_none());
    }

    #[test]
    fn test_retry_after_hint() {
        let config = RetryConfig::default().with_max_interval(Duration::from_secs(60));
        let mut policy = RetryPolicy::new(config);

        // Hint wins over the schedule
        let delay = policy.next_delay(Some(Duration::from_secs(30))).unwrap();
        assert_eq!(delay, Duration::from_secs(30));

        // Excessive hints are capped
        let config = RetryConfig::default()
            .with_tries(5)
            .with_max_interval(Duration::from_secs(60));
        let mut policy = RetryPolicy::new(config);
        let delay = policy.next_delay(Some(Duration::from_secs(120))).unwrap();
        assert_eq!(delay, Duration::from_secs(60));
    }

    #[test]
    fn test_policy_reset() {
        let config = RetryConfig::default().with_tries(2);
        let mut policy = RetryPolicy::new(config);

        policy.next_delay(None);
        assert!(!policy.should_retry());

        policy.reset();
        assert!(policy.should_retry());
        assert_eq!(policy.attempt(), 0);
    }

    fn transient() -> Error {
        Error::new(ErrorKind::Connection("refused".into()))
    }

    #[tokio::test]
    async fn test_run_retries_until_success() {
        let calls = AtomicU32::new(0);
        let config = RetryConfig::default()
            .with_tries(3)
            .with_base_interval(Duration::from_millis(1))
            .with_backoff(BackoffStrategy::Constant);

        let result: Result<u32, Error> = run(&config, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(transient())
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_run_surfaces_last_error_when_exhausted() {
        let calls = AtomicU32::new(0);
        let config = RetryConfig::default()
            .with_tries(2)
            .with_base_interval(Duration::from_millis(1))
            .with_backoff(BackoffStrategy::Constant);

        let result: Result<u32, Error> = run(&config, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(transient()) }
        })
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Connection(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_run_does_not_retry_unconfigured_classes() {
        let calls = AtomicU32::new(0);
        let config = RetryConfig::default().with_tries(3);

        let result: Result<u32, Error> = run(&config, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::new(ErrorKind::Json("bad body".into()))) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_single_attempt() {
        let calls = AtomicU32::new(0);
        let config = RetryConfig::single_attempt();

        let result: Result<u32, Error> = run(&config, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(transient()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
