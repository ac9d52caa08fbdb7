//! # Demo: retry_with_backoff
//!
//! Demonstrates how the runner automatically retries failed tasks with a
//! linear backoff ramp, while successful neighbors proceed untouched.
//!
//! The flaky task fails twice before succeeding, showing how the backoff
//! delay grows between retries and how the final result vec still comes out
//! in input order.
//!
//! ## Flow
//! ```text
//! chain:
//!   ├─► claim index=1 (flaky)
//!   ├─► attempt=1 → Err("boom #1")
//!   ├─► backoff 100ms
//!   ├─► attempt=2 → Err("boom #2")
//!   ├─► backoff 200ms
//!   └─► attempt=3 → Ok(...)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example retry_with_backoff
//! ```

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use conveyor::{BackoffPolicy, Config, Runner, TaskError, TaskFn, TaskRef};

static FAIL_COUNT: AtomicU64 = AtomicU64::new(0);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Configure the runner: 2 tasks in flight, 3 retries per task,
    //    backoff ramping 100ms, 200ms, 300ms, ...
    let cfg = Config {
        concurrency: 2,
        retries: 3,
        backoff: BackoffPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_secs(2),
        },
        ..Config::default()
    };

    // 2. No subscribers for simplicity (attach LogWriter if feature enabled)
    let runner = Runner::new(cfg, Vec::new())?;

    // 3. Define tasks: a steady one, a flaky one that fails 2 times before
    //    succeeding, and another steady one.
    let tasks: Vec<TaskRef<String>> = vec![
        TaskFn::arc(|| async {
            println!("[steady-a] done");
            Ok::<_, TaskError>("steady-a".to_string())
        }),
        TaskFn::arc(|| async {
            let attempt = FAIL_COUNT.fetch_add(1, Ordering::Relaxed) + 1;
            println!("[flaky] attempt {attempt}");
            if attempt <= 2 {
                println!("[flaky] simulated failure #{attempt}");
                Err(TaskError::Fail {
                    reason: format!("boom #{attempt}"),
                })
            } else {
                println!("[flaky] success on attempt {attempt}");
                Ok(format!("flaky after {attempt} attempts"))
            }
        }),
        TaskFn::arc(|| async {
            println!("[steady-b] done");
            Ok::<_, TaskError>("steady-b".to_string())
        }),
    ];

    // 4. Run and print outcomes in input order.
    let results = runner.run(tasks).await?;
    for (index, outcome) in results.iter().enumerate() {
        match outcome.value() {
            Some(v) => println!("[main] results[{index}] = success: {v}"),
            None => println!("[main] results[{index}] = captured: {:?}", outcome.error()),
        }
    }

    println!("[main] done.");
    Ok(())
}
