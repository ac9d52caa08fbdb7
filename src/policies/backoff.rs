//! # Backoff policy for retrying tasks.
//!
//! [`BackoffPolicy`] controls how retry delays grow after repeated failures.
//! It is parameterized by:
//! - [`BackoffPolicy::first`] the delay after the first failed attempt;
//! - [`BackoffPolicy::max`] the maximum delay cap.
//!
//! The delay for attempt `n` (0-indexed) is `first × (n + 1)`, clamped to
//! `max` — a linear ramp, purely time-based, with no jitter. Because the delay
//! is derived solely from the attempt number, previous delays never feed back
//! into subsequent calculations.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use conveyor::BackoffPolicy;
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(100),
//!     max: Duration::from_secs(10),
//! };
//!
//! // Attempt 0 — uses 'first' (100ms)
//! assert_eq!(backoff.delay_for(0), Duration::from_millis(100));
//!
//! // Attempt 1 — first × 2 = 200ms
//! assert_eq!(backoff.delay_for(1), Duration::from_millis(200));
//!
//! // Attempt 199 — 100ms × 200 = 20s → capped at max=10s
//! assert_eq!(backoff.delay_for(199), Duration::from_secs(10));
//! ```

use std::time::Duration;

/// Retry backoff policy: a linear ramp clamped to a cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Delay after the first failed attempt.
    pub first: Duration,
    /// Maximum delay cap for retries.
    pub max: Duration,
}

impl Default for BackoffPolicy {
    /// Returns a policy with `first = 100ms` and `max = 30s`, producing the
    /// sequence 100ms, 200ms, 300ms, ...
    fn default() -> Self {
        Self {
            first: Duration::from_millis(100),
            max: Duration::from_secs(30),
        }
    }
}

impl BackoffPolicy {
    /// Computes the delay for the given attempt number (0-indexed).
    ///
    /// The delay is `first × (attempt + 1)`, clamped to [`BackoffPolicy::max`].
    /// Saturates instead of overflowing for absurdly large attempt numbers.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let steps = u64::from(attempt).saturating_add(1);
        let unclamped = self
            .first
            .checked_mul(steps.min(u64::from(u32::MAX)) as u32)
            .unwrap_or(self.max);
        unclamped.min(self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_ramp() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(300));
        assert_eq!(policy.delay_for(9), Duration::from_millis(1000));
    }

    #[test]
    fn test_clamped_to_max() {
        let policy = BackoffPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_secs(1),
        };
        assert_eq!(policy.delay_for(9), Duration::from_secs(1));
        assert_eq!(policy.delay_for(100), Duration::from_secs(1));
    }

    #[test]
    fn test_first_exceeds_max() {
        let policy = BackoffPolicy {
            first: Duration::from_secs(10),
            max: Duration::from_secs(5),
        };
        assert_eq!(policy.delay_for(0), Duration::from_secs(5));
    }

    #[test]
    fn test_huge_attempt_saturates() {
        let policy = BackoffPolicy {
            first: Duration::from_secs(1),
            max: Duration::from_secs(60),
        };
        assert_eq!(policy.delay_for(u32::MAX), Duration::from_secs(60));
    }
}
