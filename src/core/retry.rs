//! # Drive one task to a terminal outcome.
//!
//! Executes a single [`Task`] with up to `retries` retries after the first
//! attempt, honoring a cancellation token, and publishes lifecycle events to
//! the [`Bus`]. All outcomes — success, exhausted failure, cancellation — are
//! returned as [`TaskOutcome`] values; this function never propagates an error
//! to its caller.
//!
//! ## Flow
//! ```text
//! loop {
//!   ├─► token cancelled?        ─► publish TaskCanceled ─► Captured(Canceled)
//!   ├─► publish TaskStarting{ index, attempt }
//!   ├─► task.run()
//!   │     ├─ Ok(value)          ─► publish TaskSucceeded ─► Success(value)
//!   │     └─ Err(e) ─► publish TaskFailed
//!   │          ├─ non-retryable or budget exhausted ─► Captured(e)
//!   │          └─► publish BackoffScheduled{ delay }
//!   │              sleep(delay)    (select: timer vs. cancellation)
//!   └─► attempt += 1
//! }
//! ```
//!
//! ## Rules
//! - The cancellation token is checked **before every attempt**, including the
//!   first.
//! - Success returns immediately: no further attempts, no backoff.
//! - The backoff wait is interruptible: if cancellation fires during the sleep,
//!   the wait ends early and the next loop iteration observes the token — the
//!   net outcome is `Captured(Canceled)`, never a further attempt.
//! - On exhaustion the **most recent** error is captured unchanged.

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::{
    error::TaskError,
    events::{Bus, Event, EventKind},
    policies::BackoffPolicy,
    tasks::{Task, TaskOutcome},
};

/// Executes `task` to a terminal [`TaskOutcome`], retrying per the budget.
///
/// `retries` is the number of retries *after* the first attempt, so a task
/// failing on every attempt is invoked exactly `retries + 1` times. `index` is
/// the task's position in the run's input sequence, used only for events.
pub(crate) async fn execute_with_retry<T: Send + 'static>(
    index: usize,
    task: &dyn Task<Output = T>,
    retries: u32,
    backoff: &BackoffPolicy,
    token: &CancellationToken,
    bus: &Bus,
) -> TaskOutcome<T> {
    let mut attempt: u32 = 0;

    loop {
        if token.is_cancelled() {
            bus.publish(
                Event::new(EventKind::TaskCanceled)
                    .with_index(index)
                    .with_attempt(attempt + 1),
            );
            return TaskOutcome::Captured(TaskError::Canceled);
        }

        bus.publish(
            Event::new(EventKind::TaskStarting)
                .with_index(index)
                .with_attempt(attempt + 1),
        );

        match task.run().await {
            Ok(value) => {
                bus.publish(
                    Event::new(EventKind::TaskSucceeded)
                        .with_index(index)
                        .with_attempt(attempt + 1),
                );
                return TaskOutcome::Success(value);
            }
            Err(e) => {
                bus.publish(
                    Event::new(EventKind::TaskFailed)
                        .with_index(index)
                        .with_attempt(attempt + 1)
                        .with_reason(e.to_string()),
                );

                if !e.is_retryable() || attempt >= retries {
                    return TaskOutcome::Captured(e);
                }

                if !token.is_cancelled() {
                    let delay = backoff.delay_for(attempt);
                    bus.publish(
                        Event::new(EventKind::BackoffScheduled)
                            .with_index(index)
                            .with_attempt(attempt + 1)
                            .with_delay(delay)
                            .with_reason(e.to_string()),
                    );

                    let sleep = time::sleep(delay);
                    tokio::pin!(sleep);
                    select! {
                        _ = &mut sleep => {}
                        _ = token.cancelled() => {}
                    }
                }

                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskFn;
    use futures::FutureExt;
    use futures::future::BoxFuture;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn bus() -> Bus {
        Bus::new(64)
    }

    fn backoff() -> BackoffPolicy {
        BackoffPolicy::default()
    }

    /// Task that fails `failures` times, then succeeds with the attempt count.
    fn flaky(
        failures: u32,
        calls: Arc<AtomicU32>,
    ) -> TaskFn<impl Fn() -> BoxFuture<'static, Result<u32, TaskError>>> {
        TaskFn::new(move || {
            let calls = Arc::clone(&calls);
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n <= failures {
                    Err(TaskError::Fail {
                        reason: format!("boom #{n}"),
                    })
                } else {
                    Ok(n)
                }
            }
            .boxed()
        })
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let task = flaky(0, Arc::clone(&calls));
        let token = CancellationToken::new();

        let outcome = execute_with_retry(0, &task, 3, &backoff(), &token, &bus()).await;

        assert_eq!(outcome, TaskOutcome::Success(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let task = flaky(2, Arc::clone(&calls));
        let token = CancellationToken::new();

        let outcome = execute_with_retry(0, &task, 3, &backoff(), &token, &bus()).await;

        // Failed twice, succeeded on the third invocation.
        assert_eq!(outcome, TaskOutcome::Success(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_preserves_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let task = flaky(u32::MAX, Arc::clone(&calls));
        let token = CancellationToken::new();

        let outcome = execute_with_retry(0, &task, 3, &backoff(), &token, &bus()).await;

        // retries = 3 → exactly 4 invocations, the 4th error captured.
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(
            outcome,
            TaskOutcome::Captured(TaskError::Fail {
                reason: "boom #4".into()
            })
        );
    }

    #[tokio::test]
    async fn test_canceled_before_first_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let task = flaky(0, Arc::clone(&calls));
        let token = CancellationToken::new();
        token.cancel();

        let outcome = execute_with_retry(0, &task, 3, &backoff(), &token, &bus()).await;

        assert_eq!(outcome, TaskOutcome::Captured(TaskError::Canceled));
        assert_eq!(calls.load(Ordering::SeqCst), 0, "task must never be invoked");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff_yields_canceled() {
        let calls = Arc::new(AtomicU32::new(0));
        let task = flaky(u32::MAX, Arc::clone(&calls));
        let token = CancellationToken::new();

        // Huge backoff: without cancellation this test would hang on the timer.
        let slow = BackoffPolicy {
            first: Duration::from_secs(3600),
            max: Duration::from_secs(3600),
        };

        let canceller = {
            let token = token.clone();
            tokio::spawn(async move {
                time::sleep(Duration::from_millis(10)).await;
                token.cancel();
            })
        };

        let outcome = execute_with_retry(0, &task, 5, &slow, &token, &bus()).await;
        let _ = canceller.await;

        // One attempt ran, cancellation interrupted the wait, the next loop
        // check observed it — no second attempt.
        assert_eq!(outcome, TaskOutcome::Captured(TaskError::Canceled));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fatal_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let task = TaskFn::new(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(TaskError::Fatal {
                    reason: "nope".into(),
                })
            }
        });
        let token = CancellationToken::new();

        let outcome = execute_with_retry(0, &task, 3, &backoff(), &token, &bus()).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            outcome,
            TaskOutcome::Captured(TaskError::Fatal {
                reason: "nope".into()
            })
        );
    }
}
