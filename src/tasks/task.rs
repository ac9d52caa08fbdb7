//! # Task abstraction.
//!
//! This module defines the [`Task`] trait: an async, zero-argument unit of
//! work producing a value or failing with a [`TaskError`]. The common handle
//! type is [`TaskRef`], an `Arc<dyn Task>` suitable for sharing across
//! dispatch chains.
//!
//! Tasks carry no name or identity of their own; the runner identifies each
//! task solely by its position in the input sequence.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;

/// Shared handle to a task producing values of type `T`.
pub type TaskRef<T> = Arc<dyn Task<Output = T>>;

/// # Asynchronous, zero-argument unit of work.
///
/// A `Task` has an async [`run`](Task::run) method invoked with no arguments.
/// Each invocation is one *attempt*; the runner may invoke `run` again after a
/// retryable failure, so implementations must be safe to re-invoke.
///
/// Cancellation is cooperative and non-preemptive: a running invocation is
/// never interrupted, so tasks need no cancellation plumbing of their own.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use conveyor::{Task, TaskError};
///
/// struct Demo;
///
/// #[async_trait]
/// impl Task for Demo {
///     type Output = u32;
///
///     async fn run(&self) -> Result<u32, TaskError> {
///         // do work...
///         Ok(42)
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// The value produced on success.
    type Output: Send + 'static;

    /// Executes one attempt of the task.
    ///
    /// Returning [`TaskError::Fail`] makes the attempt retryable; any other
    /// error is captured as-is without further attempts.
    async fn run(&self) -> Result<Self::Output, TaskError>;
}
