//! # Runner: bounded dispatch with ordered result collection.
//!
//! The [`Runner`] owns the event bus and global configuration. Each call to
//! [`Runner::run`] builds a fresh `RunState` (claim cursor + write-once outcome
//! slots), spawns `min(concurrency, len)` dispatch chains, and joins them into
//! a complete, input-ordered result vec.
//!
//! ## High-level architecture
//! ```text
//! Inputs to run():
//!   Vec<TaskRef<T>>  ──►  Runner::run()
//!
//! Preparation:
//!   - reject if another run is in flight (atomic flag, RAII release)
//!   - fresh CancellationToken per run (cancel_all() targets the current one)
//!   - RunState: claim cursor (AtomicUsize) + outcome slots (Mutex<Vec<Option<_>>>)
//!
//! Dispatch:
//!   chain #1 ... chain #C                      C = min(concurrency, len)
//!       │
//!       └─► loop {
//!             token cancelled? ─► exit
//!             claim next index (fetch_add) ─► none left? ─► exit
//!             execute_with_retry(index, task)
//!             record outcome into slots[index]
//!           }
//!
//! Completion:
//!   JoinSet drained (all chains exited)
//!     ├─► unset slots filled with Captured(Canceled)
//!     └─► full vec returned in input order
//! ```
//!
//! ## Rules
//! - Each index is claimed by **exactly one** chain (atomic claim-and-increment).
//! - Each slot is written **at most once**, by the chain that claimed it.
//! - Dispatch order is FIFO by index; completion order is unconstrained.
//! - The ceiling is structural: C chains × one task at a time each.
//! - Cancellation stops claims and retries; it never interrupts a running
//!   task invocation.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    core::retry::execute_with_retry,
    error::{RunnerError, TaskError},
    events::{Bus, Event, EventKind},
    policies::BackoffPolicy,
    subscribers::{Subscribe, SubscriberSet},
    tasks::{TaskOutcome, TaskRef},
};

/// Bounded-concurrency task runner with retries and ordered results.
///
/// A runner may be reused for multiple **sequential** runs; overlapping calls
/// to [`Runner::run`] on the same instance are rejected with
/// [`RunnerError::RunInProgress`]. Each run observes its own cancellation
/// token, so a `cancel_all()` aimed at a finished run never leaks into the
/// next one.
pub struct Runner {
    /// Global runner configuration.
    cfg: Config,
    /// Event bus shared with all dispatch chains.
    bus: Bus,
    /// Token for the run currently in flight (replaced at the start of each run).
    cancel: Mutex<CancellationToken>,
    /// Guards against overlapping runs on the same instance.
    in_flight: AtomicBool,
}

impl Runner {
    /// Creates a new runner with the given config and subscribers.
    ///
    /// Validates `cfg.concurrency` synchronously, before any other work.
    ///
    /// ### Errors
    /// [`RunnerError::InvalidConcurrency`] if `cfg.concurrency` is zero.
    ///
    /// ### Notes
    /// When `subscribers` is non-empty, a listener task is spawned to fan
    /// events out to them, so construction must happen inside a tokio runtime.
    /// With no subscribers the runner is runtime-free until `run` is called.
    pub fn new(cfg: Config, subscribers: Vec<Arc<dyn Subscribe>>) -> Result<Self, RunnerError> {
        if cfg.concurrency == 0 {
            return Err(RunnerError::InvalidConcurrency {
                concurrency: cfg.concurrency,
            });
        }

        let bus = Bus::new(cfg.bus_capacity_clamped());
        let subs = SubscriberSet::new(subscribers);
        if !subs.is_empty() {
            Self::subscriber_listener(&bus, Arc::new(subs));
        }

        Ok(Self {
            cfg,
            bus,
            cancel: Mutex::new(CancellationToken::new()),
            in_flight: AtomicBool::new(false),
        })
    }

    /// Subscribes to the bus and forwards events to the subscriber set
    /// (fire-and-forget). The listener exits when the runner is dropped.
    fn subscriber_listener(bus: &Bus, set: Arc<SubscriberSet>) {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                set.emit(&ev);
            }
        });
    }

    /// Runs the provided tasks to completion, returning one outcome per task
    /// **in input order**, regardless of completion order.
    ///
    /// - An empty input resolves immediately to an empty vec, with zero
    ///   invocations.
    /// - No task failure ever aborts the run: failures are captured into the
    ///   task's slot after the retry budget is exhausted.
    /// - On cancellation, in-flight tasks finish their current attempt and
    ///   every never-started task is captured as [`TaskError::Canceled`].
    ///
    /// ### Errors
    /// [`RunnerError::RunInProgress`] if another run is in flight on this
    /// instance. Sequential reuse is supported.
    pub async fn run<T: Send + 'static>(
        &self,
        tasks: Vec<TaskRef<T>>,
    ) -> Result<Vec<TaskOutcome<T>>, RunnerError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(RunnerError::RunInProgress);
        }
        let _flight = FlightGuard {
            flag: &self.in_flight,
        };

        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let token = self.replace_token();
        let state = Arc::new(RunState::new(tasks));
        let total = state.total();
        self.bus
            .publish(Event::new(EventKind::RunStarted).with_total(total));

        let chains = self.cfg.concurrency.min(total);
        let mut set = JoinSet::new();
        for _ in 0..chains {
            set.spawn(dispatch_chain(
                Arc::clone(&state),
                token.clone(),
                self.bus.clone(),
                self.cfg.retries,
                self.cfg.backoff,
            ));
        }
        while set.join_next().await.is_some() {}

        let results = state.take_results();
        self.bus
            .publish(Event::new(EventKind::RunFinished).with_total(total));
        Ok(results)
    }

    /// Requests cooperative cancellation of the run in flight.
    ///
    /// Idempotent: repeated calls are no-ops once cancelled. Stops new index
    /// claims and further retries; an already-started task invocation is never
    /// interrupted and its outcome is still recorded. Calling this with no run
    /// in flight affects nothing — every run starts with a fresh token.
    pub fn cancel_all(&self) {
        let token = self.current_token();
        if !token.is_cancelled() {
            self.bus.publish(Event::new(EventKind::CancelRequested));
            token.cancel();
        }
    }

    /// Installs a fresh token for a new run and returns it.
    fn replace_token(&self) -> CancellationToken {
        let fresh = CancellationToken::new();
        *lock_recover(&self.cancel) = fresh.clone();
        fresh
    }

    /// Returns a clone of the current run's token.
    fn current_token(&self) -> CancellationToken {
        lock_recover(&self.cancel).clone()
    }
}

/// Resets the in-flight flag when a run exits, on every path.
struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Per-run bookkeeping: the fixed task list, the claim cursor, and the
/// write-once outcome slots. Created fresh for every run, shared across its
/// dispatch chains, destroyed when the result vec is delivered.
struct RunState<T> {
    tasks: Vec<TaskRef<T>>,
    slots: Mutex<Vec<Option<TaskOutcome<T>>>>,
    cursor: AtomicUsize,
}

impl<T> RunState<T> {
    fn new(tasks: Vec<TaskRef<T>>) -> Self {
        let slots = (0..tasks.len()).map(|_| None).collect();
        Self {
            tasks,
            slots: Mutex::new(slots),
            cursor: AtomicUsize::new(0),
        }
    }

    fn total(&self) -> usize {
        self.tasks.len()
    }

    /// Claims the next unclaimed index, or `None` when the cursor is
    /// exhausted. The fetch_add makes the claim atomic: no two chains can
    /// claim the same index.
    fn claim(&self) -> Option<(usize, TaskRef<T>)> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.tasks.get(index).map(|task| (index, Arc::clone(task)))
    }

    /// Records the outcome for a claimed index. Each index is recorded at most
    /// once, by the single chain that claimed it.
    fn record(&self, index: usize, outcome: TaskOutcome<T>) {
        let mut slots = lock_recover(&self.slots);
        if let Some(slot) = slots.get_mut(index) {
            debug_assert!(slot.is_none(), "outcome slot {index} written twice");
            *slot = Some(outcome);
        }
    }

    /// Drains the slots into the final result vec, filling every slot left
    /// unset (never claimed before cancellation) with a canceled outcome.
    fn take_results(&self) -> Vec<TaskOutcome<T>> {
        let mut slots = lock_recover(&self.slots);
        std::mem::take(&mut *slots)
            .into_iter()
            .map(|slot| slot.unwrap_or(TaskOutcome::Captured(TaskError::Canceled)))
            .collect()
    }
}

/// One dispatch chain: claim, execute, record, repeat — until the cursor is
/// exhausted or cancellation is observed. Recording never fails, so the chain
/// unconditionally proceeds to the next claim after every outcome.
async fn dispatch_chain<T: Send + 'static>(
    state: Arc<RunState<T>>,
    token: CancellationToken,
    bus: Bus,
    retries: u32,
    backoff: BackoffPolicy,
) {
    loop {
        if token.is_cancelled() {
            break;
        }
        let Some((index, task)) = state.claim() else {
            break;
        };
        let outcome = execute_with_retry(index, task.as_ref(), retries, &backoff, &token, &bus).await;
        state.record(index, outcome);
    }
}

/// Locks a mutex, recovering the guard if a panicking holder poisoned it.
fn lock_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskFn;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;
    use tokio::time;

    fn runner(concurrency: usize) -> Runner {
        let cfg = Config {
            concurrency,
            ..Config::default()
        };
        Runner::new(cfg, Vec::new()).expect("valid config")
    }

    fn ok_after(delay: Duration, value: usize) -> TaskRef<usize> {
        TaskFn::arc(move || async move {
            time::sleep(delay).await;
            Ok::<_, TaskError>(value)
        })
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let cfg = Config {
            concurrency: 0,
            ..Config::default()
        };
        let err = match Runner::new(cfg, Vec::new()) {
            Err(e) => e,
            Ok(_) => panic!("construction must fail"),
        };
        assert_eq!(err, RunnerError::InvalidConcurrency { concurrency: 0 });
    }

    #[tokio::test]
    async fn test_empty_input_resolves_immediately() {
        let runner = runner(4);
        let results = runner.run(Vec::<TaskRef<u32>>::new()).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_follow_input_order() {
        // Decreasing-ish delays: later tasks finish before earlier ones.
        let delays = [200u64, 50, 100, 30, 150];
        let tasks: Vec<TaskRef<usize>> = delays
            .iter()
            .enumerate()
            .map(|(i, ms)| ok_after(Duration::from_millis(*ms), i))
            .collect();

        let runner = runner(3);
        let results = runner.run(tasks).await.unwrap();

        assert_eq!(results.len(), 5);
        for (i, outcome) in results.iter().enumerate() {
            assert_eq!(outcome.value(), Some(&i), "slot {i} out of order");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_ceiling_is_strict() {
        let current = Arc::new(AtomicU32::new(0));
        let peak = Arc::new(AtomicU32::new(0));

        let tasks: Vec<TaskRef<u32>> = (0..8)
            .map(|_| -> TaskRef<u32> {
                let current = Arc::clone(&current);
                let peak = Arc::clone(&peak);
                TaskFn::arc(move || {
                    let current = Arc::clone(&current);
                    let peak = Arc::clone(&peak);
                    async move {
                        let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        time::sleep(Duration::from_millis(10)).await;
                        current.fetch_sub(1, Ordering::SeqCst);
                        Ok::<_, TaskError>(now)
                    }
                })
            })
            .collect();

        let runner = runner(2);
        let results = runner.run(tasks).await.unwrap();

        assert!(results.iter().all(|r| r.is_success()));
        assert!(
            peak.load(Ordering::SeqCst) <= 2,
            "observed {} simultaneous tasks",
            peak.load(Ordering::SeqCst)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_mixed_outcomes() {
        let tasks: Vec<TaskRef<i32>> = vec![
            TaskFn::arc(|| async { Ok::<_, TaskError>(1) }),
            TaskFn::arc(|| async {
                Err::<i32, _>(TaskError::Fail {
                    reason: "e2".into(),
                })
            }),
            TaskFn::arc(|| async { Ok::<_, TaskError>(3) }),
        ];

        let cfg = Config {
            concurrency: 2,
            retries: 2,
            ..Config::default()
        };
        let runner = Runner::new(cfg, Vec::new()).unwrap();
        let results = runner.run(tasks).await.unwrap();

        assert_eq!(results[0], TaskOutcome::Success(1));
        assert_eq!(
            results[1],
            TaskOutcome::Captured(TaskError::Fail {
                reason: "e2".into()
            })
        );
        assert_eq!(results[2], TaskOutcome::Success(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_task_invoked_retries_plus_one_times() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let tasks: Vec<TaskRef<u32>> = vec![TaskFn::arc(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(TaskError::Fail {
                    reason: "always".into(),
                })
            }
        })];

        let cfg = Config {
            concurrency: 1,
            retries: 3,
            ..Config::default()
        };
        let runner = Runner::new(cfg, Vec::new()).unwrap();
        let results = runner.run(tasks).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(results[0].is_captured());
        assert!(!results[0].is_canceled(), "real failure, not cancellation");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_partial_completion() {
        let tasks: Vec<TaskRef<usize>> = (0..3)
            .map(|i| ok_after(Duration::from_millis(30), i))
            .collect();

        let runner = Arc::new(runner(1));
        let handle = {
            let runner = Arc::clone(&runner);
            tokio::spawn(async move { runner.run(tasks).await })
        };

        time::sleep(Duration::from_millis(35)).await;
        runner.cancel_all();

        let results = handle.await.unwrap().unwrap();
        assert_eq!(results.len(), 3);
        assert!(
            results[0].is_success(),
            "the already-started task must finish"
        );
        assert!(
            results[2].is_canceled(),
            "the never-claimed task must be captured as canceled"
        );
        assert_eq!(
            results[2].error().map(|e| e.to_string()).as_deref(),
            Some("canceled before completion")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_run_rejected_sequential_reuse_ok() {
        let runner = Arc::new(runner(1));

        let first = {
            let runner = Arc::clone(&runner);
            let tasks = vec![ok_after(Duration::from_millis(50), 0)];
            tokio::spawn(async move { runner.run(tasks).await })
        };

        // Let the first run claim its flight slot.
        time::sleep(Duration::from_millis(1)).await;
        let overlapping = runner.run(vec![ok_after(Duration::ZERO, 1)]).await;
        assert_eq!(overlapping, Err(RunnerError::RunInProgress));

        let results = first.await.unwrap().unwrap();
        assert!(results[0].is_success());

        // After the first run resolved, the runner is reusable.
        let again = runner.run(vec![ok_after(Duration::ZERO, 2)]).await.unwrap();
        assert_eq!(again[0], TaskOutcome::Success(2));
    }

    #[tokio::test]
    async fn test_cancel_all_is_idempotent_and_per_run() {
        let runner = runner(2);

        // No run in flight: cancelling (twice) must not poison the next run.
        runner.cancel_all();
        runner.cancel_all();

        let tasks: Vec<TaskRef<u32>> = vec![
            TaskFn::arc(|| async { Ok::<_, TaskError>(1) }),
            TaskFn::arc(|| async { Ok::<_, TaskError>(2) }),
        ];
        let results = runner.run(tasks).await.unwrap();
        assert!(results.iter().all(|r| r.is_success()));
    }
}
