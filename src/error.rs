//! Error types used by the conveyor runner and tasks.
//!
//! This module defines two main error enums:
//!
//! - [`RunnerError`] — errors raised by the runner surface itself.
//! - [`TaskError`] — errors raised by individual task executions.
//!
//! Both types provide an `as_label` helper for logging/metrics, and
//! [`TaskError`] adds [`TaskError::is_retryable`].
//!
//! ## Propagation policy
//! No [`TaskError`] ever aborts a run: every per-task failure is captured into
//! that task's outcome slot. [`RunnerError`] is the only error a caller sees
//! from the runner API, and only for invalid construction or a rejected
//! re-entrant `run` call.

use thiserror::Error;

/// # Errors produced by the runner surface.
///
/// These represent misuse of the runner API, not task failures. They are
/// surfaced synchronously (construction) or before any task is dispatched
/// (re-entrant run).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunnerError {
    /// Concurrency must be a positive integer; the run never starts.
    #[error("concurrency must be a positive integer, got {concurrency}")]
    InvalidConcurrency {
        /// The rejected concurrency value.
        concurrency: usize,
    },

    /// A run is already in flight on this runner instance.
    ///
    /// Sequential reuse is supported; overlapping `run` calls are not.
    #[error("a run is already in flight on this runner")]
    RunInProgress,
}

impl RunnerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use conveyor::RunnerError;
    ///
    /// let err = RunnerError::InvalidConcurrency { concurrency: 0 };
    /// assert_eq!(err.as_label(), "invalid_concurrency");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RunnerError::InvalidConcurrency { .. } => "invalid_concurrency",
            RunnerError::RunInProgress => "run_in_progress",
        }
    }
}

/// # Errors produced by task execution.
///
/// These represent failures of individual async tasks managed by the runner.
/// `Fail` is retryable; `Fatal` and `Canceled` are terminal.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task execution failed but may succeed if retried.
    #[error("execution failed: {reason}")]
    Fail {
        /// The underlying error message.
        reason: String,
    },

    /// Non-recoverable error (never retried, captured as-is).
    #[error("fatal error (no retry): {reason}")]
    Fatal {
        /// The underlying error message.
        reason: String,
    },

    /// Task never ran to completion because the run was cancelled.
    ///
    /// Carries a fixed message so callers can distinguish cancellation from
    /// ordinary task failures.
    #[error("canceled before completion")]
    Canceled,
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use conveyor::TaskError;
    ///
    /// let err = TaskError::Fail { reason: "boom".into() };
    /// assert_eq!(err.as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Fatal { .. } => "task_fatal",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// Indicates whether the error type is safe to retry.
    ///
    /// Returns `true` only for [`TaskError::Fail`].
    ///
    /// # Example
    /// ```
    /// use conveyor::TaskError;
    ///
    /// let retryable = TaskError::Fail { reason: "boom".into() };
    /// assert!(retryable.is_retryable());
    ///
    /// let fatal = TaskError::Fatal { reason: "nope".into() };
    /// assert!(!fatal.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, TaskError::Fail { .. })
    }
}
