//! # LogWriter — simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [run-started] total=3
//! [starting] index=0 attempt=1
//! [failed] index=0 attempt=1 err="connection refused"
//! [backoff] index=0 delay_ms=100 after_attempt=1 err="connection refused"
//! [succeeded] index=0 attempt=2
//! [cancel-requested]
//! [canceled] index=2
//! [run-finished] total=3
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::RunStarted => {
                println!("[run-started] total={:?}", e.total);
            }
            EventKind::RunFinished => {
                println!("[run-finished] total={:?}", e.total);
            }
            EventKind::CancelRequested => {
                println!("[cancel-requested]");
            }
            EventKind::TaskStarting => {
                println!("[starting] index={:?} attempt={:?}", e.index, e.attempt);
            }
            EventKind::TaskSucceeded => {
                println!("[succeeded] index={:?} attempt={:?}", e.index, e.attempt);
            }
            EventKind::TaskFailed => {
                println!(
                    "[failed] index={:?} attempt={:?} err={:?}",
                    e.index, e.attempt, e.reason
                );
            }
            EventKind::TaskCanceled => {
                println!("[canceled] index={:?}", e.index);
            }
            EventKind::BackoffScheduled => {
                println!(
                    "[backoff] index={:?} delay_ms={:?} after_attempt={:?} err={:?}",
                    e.index, e.delay_ms, e.attempt, e.reason
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
