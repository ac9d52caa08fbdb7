//! # Closure-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per
//! invocation. This is what makes retries sound: every attempt re-invokes the
//! closure and gets a future that owns its own state.
//!
//! ## Concurrency semantics
//! - Each call to [`Task::run`] creates a **new** future.
//! - No hidden mutation between attempts; if shared state is needed, capture
//!   an `Arc<...>` explicitly inside the closure.
//!
//! ## Example
//! ```rust
//! use conveyor::{TaskFn, TaskRef, TaskError};
//!
//! let t: TaskRef<u32> = TaskFn::arc(|| async {
//!     // do work...
//!     Ok::<_, TaskError>(7)
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::task::Task;

/// Closure-backed task implementation.
///
/// Wraps a closure that *creates* a new future per attempt.
#[derive(Debug)]
pub struct TaskFn<F> {
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new closure-backed task.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a [`TaskRef`](crate::TaskRef).
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut, T> Task for TaskFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    T: Send + 'static,
{
    type Output = T;

    async fn run(&self) -> Result<T, TaskError> {
        (self.f)().await
    }
}
