//! # Task abstractions and outcomes.
//!
//! This module provides the core task-related types:
//! - [`Task`] - trait for implementing async tasks
//! - [`TaskFn`] - closure-based task implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)
//! - [`TaskOutcome`] - terminal per-task result (success or captured failure)

mod outcome;
mod task;
mod task_fn;

pub use outcome::TaskOutcome;
pub use task::{Task, TaskRef};
pub use task_fn::TaskFn;
