//! # conveyor
//!
//! **Conveyor** is a bounded-concurrency task runner for Rust.
//!
//! Tasks go in as an ordered sequence, at most `concurrency` of them execute
//! simultaneously, failing tasks are retried with backoff, and exactly one
//! outcome per task comes out — in the original input order, regardless of
//! completion order. Cooperative cancellation stops unstarted work while
//! letting in-flight work finish.
//!
//! ## Architecture
//! ```text
//!   tasks[0]  tasks[1]  tasks[2] ... tasks[N-1]     (ordered input)
//!      │          │         │            │
//!      └──────────┴────┬────┴────────────┘
//!                      ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  Runner::run()                                             │
//! │  - RunState (claim cursor + write-once outcome slots)      │
//! │  - CancellationToken (fresh per run)                       │
//! └──────┬──────────────────┬──────────────────┬───────────────┘
//!        ▼                  ▼                  ▼
//!   ┌──────────┐      ┌──────────┐       ┌──────────┐
//!   │ chain #1 │      │ chain #2 │  ...  │ chain #C │   C = min(concurrency, N)
//!   └────┬─────┘      └────┬─────┘       └────┬─────┘
//!        │ loop {               each chain:
//!        │   claim next index ──► execute_with_retry() ──► record outcome
//!        │ } until cursor exhausted or cancelled
//!        │
//!        │ Publishes Events: RunStarted, TaskStarting, TaskFailed,
//!        │ BackoffScheduled, TaskSucceeded, TaskCanceled, RunFinished
//!        ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Bus (broadcast channel)                 │
//! └──────────────────────────┬─────────────────────────────────┘
//!                            ▼
//!                     SubscriberSet
//!                   (per-sub queues + workers)
//! ```
//!
//! ## Per-task lifecycle
//! ```text
//! execute_with_retry(index, task):
//!
//! loop {
//!   ├─► token cancelled?        ─► Captured(Canceled), exit
//!   ├─► publish TaskStarting{ index, attempt }
//!   ├─► task.run()
//!   │     ├─ Ok(value)          ─► Success(value), exit
//!   │     └─ Err(e):
//!   │          ├─ fatal or budget exhausted ─► Captured(e), exit
//!   │          ├─► publish BackoffScheduled{ delay }
//!   │          └─► sleep(delay)   (interruptible by cancellation;
//!   │                              the next loop check observes it)
//!   └─► attempt += 1
//! }
//! ```
//!
//! ## Guarantees
//! | Property              | Description                                                          |
//! |-----------------------|----------------------------------------------------------------------|
//! | **Ordering**          | `results[i]` always corresponds to `tasks[i]`.                       |
//! | **Ceiling**           | Never more than `concurrency` tasks between claim and outcome.       |
//! | **Completeness**      | The result vec is always same-length, every slot filled.             |
//! | **Capture, not abort**| No task failure ever aborts the run; failures become `Captured`.     |
//! | **Cooperative cancel**| `cancel_all()` stops claims and retries, never a running invocation. |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use conveyor::{Config, Runner, TaskError, TaskFn, TaskRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::default();
//!     cfg.concurrency = 2;
//!
//!     let runner = Runner::new(cfg, Vec::new())?;
//!
//!     let tasks: Vec<TaskRef<u32>> = (0u32..5)
//!         .map(|i| -> TaskRef<u32> {
//!             TaskFn::arc(move || async move { Ok::<_, TaskError>(i * i) })
//!         })
//!         .collect();
//!
//!     let results = runner.run(tasks).await?;
//!     assert_eq!(results.len(), 5);
//!     assert!(results.iter().all(|r| r.is_success()));
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod policies;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use config::Config;
pub use core::Runner;
pub use error::{RunnerError, TaskError};
pub use events::{Event, EventKind};
pub use policies::BackoffPolicy;
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{Task, TaskFn, TaskOutcome, TaskRef};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
