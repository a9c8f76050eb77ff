//! Bounded retry around store writes.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StoreError;

use super::assembler::StoredRow;
use super::store::RowStore;

/// How the wait between attempts grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed,
    /// Delay doubles after each failed attempt.
    Exponential,
}

/// Retry policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Backoff strategy.
    pub backoff: Backoff,
    /// Delay before the first retry in milliseconds.
    pub base_delay_ms: u64,
    /// Maximum delay cap in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::Fixed,
            base_delay_ms: 1_000,
            max_delay_ms: 10_000,
        }
    }
}

impl RetryPolicy {
    /// Policy that never waits, for tests and local stores.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
            ..Default::default()
        }
    }

    /// Delay after failed attempt `attempt_number` (1-indexed).
    pub fn delay_for(&self, attempt_number: u32) -> Duration {
        if attempt_number == 0 {
            return Duration::ZERO;
        }
        let delay_ms = match self.backoff {
            Backoff::Fixed => self.base_delay_ms,
            Backoff::Exponential => {
                let factor = 2u64.saturating_pow(attempt_number - 1);
                self.base_delay_ms.saturating_mul(factor)
            }
        };
        Duration::from_millis(delay_ms.min(self.max_delay_ms))
    }

    /// Whether another attempt is allowed after `attempt_number` failures.
    pub fn should_retry(&self, attempt_number: u32) -> bool {
        attempt_number < self.max_attempts
    }
}

/// Store decorator applying a [`RetryPolicy`] to transient append failures.
pub struct RetryingStore<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: RowStore> RetryingStore<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: RowStore> RowStore for RetryingStore<S> {
    fn append(&mut self, row: &StoredRow) -> Result<(), StoreError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.inner.append(row) {
                Ok(()) => {
                    if attempt > 1 {
                        debug!(attempt, "Store append succeeded after retry");
                    }
                    return Ok(());
                }
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) if self.policy.should_retry(attempt) => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        attempt,
                        max = self.policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Store append failed, will retry"
                    );
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                }
                Err(e) => {
                    warn!(attempt, "Store append retry policy exhausted");
                    return Err(StoreError::Exhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Column, MemoryStore};

    /// Fails a fixed number of times before delegating.
    struct Flaky {
        failures_left: u32,
        calls: u32,
        inner: MemoryStore,
        permanent: bool,
    }

    impl Flaky {
        fn new(failures: u32) -> Self {
            Self {
                failures_left: failures,
                calls: 0,
                inner: MemoryStore::new(),
                permanent: false,
            }
        }
    }

    impl RowStore for Flaky {
        fn append(&mut self, row: &StoredRow) -> Result<(), StoreError> {
            self.calls += 1;
            if self.permanent {
                return Err(StoreError::Rejected("quota exceeded".into()));
            }
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(StoreError::Unavailable("timeout".into()));
            }
            self.inner.append(row)
        }
    }

    fn row() -> StoredRow {
        StoredRow {
            columns: vec![Column::Name],
            values: vec!["John Doe".into()],
        }
    }

    #[test]
    fn test_recovers_within_budget() {
        let mut store = RetryingStore::new(Flaky::new(2), RetryPolicy::immediate(3));
        store.append(&row()).unwrap();

        assert_eq!(store.inner().calls, 3);
        assert_eq!(store.inner().inner.rows().len(), 1);
    }

    #[test]
    fn test_exhaustion() {
        let mut store = RetryingStore::new(Flaky::new(5), RetryPolicy::immediate(3));
        let err = store.append(&row()).unwrap_err();

        assert!(matches!(err, StoreError::Exhausted { attempts: 3, .. }));
        assert_eq!(store.inner().calls, 3);
    }

    #[test]
    fn test_permanent_error_not_retried() {
        let mut flaky = Flaky::new(0);
        flaky.permanent = true;
        let mut store = RetryingStore::new(flaky, RetryPolicy::immediate(3));

        assert!(matches!(store.append(&row()), Err(StoreError::Rejected(_))));
        assert_eq!(store.inner().calls, 1);
    }

    #[test]
    fn test_fixed_and_exponential_delays() {
        let fixed = RetryPolicy::default();
        assert_eq!(fixed.delay_for(1), fixed.delay_for(2));

        let exp = RetryPolicy {
            backoff: Backoff::Exponential,
            base_delay_ms: 500,
            max_delay_ms: 1_500,
            ..Default::default()
        };
        assert_eq!(exp.delay_for(1).as_millis(), 500);
        assert_eq!(exp.delay_for(2).as_millis(), 1_000);
        assert_eq!(exp.delay_for(3).as_millis(), 1_500);
        assert_eq!(exp.delay_for(40).as_millis(), 1_500);
    }

    #[test]
    fn test_should_retry() {
        let policy = RetryPolicy { max_attempts: 2, ..Default::default() };
        assert!(policy.should_retry(1));
        assert!(!policy.should_retry(2));
    }
}
