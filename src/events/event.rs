//! # Runtime events emitted by the runner and its dispatch chains.
//!
//! The [`EventKind`] enum classifies event types across two categories:
//! - **Run events**: run lifecycle (started, finished, cancel requested)
//! - **Task events**: per-task execution flow (starting, succeeded, failed,
//!   canceled, backoff scheduled)
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! task index, attempt numbers, reasons, and backoff delays. Tasks have no
//! names: they are identified by their index in the run's input sequence.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use conveyor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_index(2)
//!     .with_attempt(3)
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.index, Some(2));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Run events ===
    /// A run began dispatching tasks.
    ///
    /// Sets:
    /// - `total`: number of tasks in the run
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    RunStarted,

    /// A run delivered its full result vec.
    ///
    /// Sets:
    /// - `total`: number of tasks in the run
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    RunFinished,

    /// Cancellation was requested for the run in flight.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    CancelRequested,

    // === Task events ===
    /// A task is starting an attempt.
    ///
    /// Sets:
    /// - `index`: task position in the input sequence
    /// - `attempt`: attempt number (1-based)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskStarting,

    /// A task produced its value.
    ///
    /// Sets:
    /// - `index`: task position
    /// - `attempt`: succeeding attempt number
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskSucceeded,

    /// A task attempt failed.
    ///
    /// Sets:
    /// - `index`: task position
    /// - `attempt`: failing attempt number
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskFailed,

    /// A task was captured as canceled without (further) execution.
    ///
    /// Sets:
    /// - `index`: task position
    /// - `attempt`: attempt that would have run next
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskCanceled,

    /// A retry was scheduled after a failed attempt.
    ///
    /// Sets:
    /// - `index`: task position
    /// - `attempt`: previous attempt number
    /// - `delay_ms`: delay before the next attempt (ms)
    /// - `reason`: last failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    BackoffScheduled,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Task index in the run's input sequence, if applicable.
    pub index: Option<usize>,
    /// Total number of tasks in the run (run events only).
    pub total: Option<usize>,
    /// Attempt count (starting from 1).
    pub attempt: Option<u32>,
    /// Backoff delay before next attempt in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Human-readable reason (failure messages).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            index: None,
            total: None,
            attempt: None,
            delay_ms: None,
            reason: None,
        }
    }

    /// Attaches a task index.
    #[inline]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Attaches the run's task total.
    #[inline]
    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a backoff delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::RunStarted);
        let b = Event::new(EventKind::RunFinished);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_delay_stored_as_millis() {
        let ev = Event::new(EventKind::BackoffScheduled).with_delay(Duration::from_secs(2));
        assert_eq!(ev.delay_ms, Some(2000));
    }
}
