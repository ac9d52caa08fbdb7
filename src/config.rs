//! # Runner configuration.
//!
//! Provides [`Config`], the centralized settings for a [`Runner`](crate::Runner).
//!
//! ## Field semantics
//! - `concurrency`: maximum tasks in flight at once (**must be >= 1**; validated
//!   by `Runner::new`)
//! - `retries`: retry budget per task *after* the first attempt
//!   (total attempts = `retries + 1`)
//! - `backoff`: delay policy between a failed attempt and the next one
//! - `bus_capacity`: event bus ring buffer size (min 1; clamped)

use crate::policies::BackoffPolicy;

/// Configuration for a [`Runner`](crate::Runner).
///
/// All fields are public for flexibility. `concurrency` is validated when the
/// runner is constructed, not here.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Maximum number of tasks executing simultaneously.
    ///
    /// The ceiling is strict: the number of tasks past "claimed" and before
    /// "outcome written" never exceeds this value. Zero is invalid and rejected
    /// by `Runner::new`.
    pub concurrency: usize,

    /// Retry budget per task, not counting the first attempt.
    ///
    /// A task failing on every attempt is invoked exactly `retries + 1` times
    /// before its last error is captured.
    pub retries: u32,

    /// Delay policy applied between a failed attempt and the next retry.
    pub backoff: BackoffPolicy,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events will
    /// skip older items. Minimum value is 1 (enforced by the bus).
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `concurrency = 1` (sequential; raise it to get parallelism)
    /// - `retries = 3` (4 total attempts)
    /// - `backoff = BackoffPolicy::default()` (100ms, 200ms, 300ms, ...)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            concurrency: 1,
            retries: 3,
            backoff: BackoffPolicy::default(),
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.concurrency, 1);
        assert_eq!(cfg.retries, 3);
        assert_eq!(cfg.backoff.first, Duration::from_millis(100));
        assert_eq!(cfg.bus_capacity, 1024);
    }

    #[test]
    fn test_bus_capacity_clamped_to_one() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
