//! # Terminal per-task outcome.
//!
//! [`TaskOutcome`] is the result of one task's full execution, retries
//! included: either a success with its value, or the captured error that
//! exhausted the retry budget (or cancellation).
//!
//! The runner never surfaces task failures as errors of its own; callers
//! receive a complete, same-length, same-order vec of outcomes and inspect
//! each slot.
//!
//! ## Example
//! ```rust
//! use conveyor::{TaskError, TaskOutcome};
//!
//! let ok: TaskOutcome<u32> = TaskOutcome::Success(7);
//! assert_eq!(ok.status(), "success");
//! assert_eq!(ok.value(), Some(&7));
//!
//! let bad: TaskOutcome<u32> = TaskOutcome::Captured(TaskError::Canceled);
//! assert_eq!(bad.status(), "captured");
//! assert!(bad.is_canceled());
//! ```

use crate::error::TaskError;

/// Terminal result of one task's execution, retries included.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome<T> {
    /// The task produced a value.
    Success(T),
    /// The task never produced a value; the last error was captured.
    Captured(TaskError),
}

impl<T> TaskOutcome<T> {
    /// Returns the outcome status as a stable string: `"success"` or `"captured"`.
    pub fn status(&self) -> &'static str {
        match self {
            TaskOutcome::Success(_) => "success",
            TaskOutcome::Captured(_) => "captured",
        }
    }

    /// True if the task produced a value.
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success(_))
    }

    /// True if the task's failure was captured.
    pub fn is_captured(&self) -> bool {
        matches!(self, TaskOutcome::Captured(_))
    }

    /// True if the task was captured specifically due to cancellation.
    pub fn is_canceled(&self) -> bool {
        matches!(self, TaskOutcome::Captured(TaskError::Canceled))
    }

    /// Returns the success value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            TaskOutcome::Success(v) => Some(v),
            TaskOutcome::Captured(_) => None,
        }
    }

    /// Consumes the outcome, returning the success value, if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            TaskOutcome::Success(v) => Some(v),
            TaskOutcome::Captured(_) => None,
        }
    }

    /// Returns the captured error, if any.
    pub fn error(&self) -> Option<&TaskError> {
        match self {
            TaskOutcome::Success(_) => None,
            TaskOutcome::Captured(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_accessors() {
        let outcome = TaskOutcome::Success("done");
        assert!(outcome.is_success());
        assert!(!outcome.is_captured());
        assert!(!outcome.is_canceled());
        assert_eq!(outcome.value(), Some(&"done"));
        assert_eq!(outcome.error(), None);
        assert_eq!(outcome.into_value(), Some("done"));
    }

    #[test]
    fn test_captured_accessors() {
        let outcome: TaskOutcome<u32> = TaskOutcome::Captured(TaskError::Fail {
            reason: "boom".into(),
        });
        assert!(outcome.is_captured());
        assert!(!outcome.is_canceled());
        assert_eq!(outcome.value(), None);
        assert_eq!(
            outcome.error(),
            Some(&TaskError::Fail {
                reason: "boom".into()
            })
        );
    }

    #[test]
    fn test_canceled_is_distinguishable() {
        let outcome: TaskOutcome<u32> = TaskOutcome::Captured(TaskError::Canceled);
        assert!(outcome.is_canceled());
        assert_eq!(outcome.status(), "captured");
    }
}
