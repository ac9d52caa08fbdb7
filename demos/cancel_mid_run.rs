//! # Demo: cancel_mid_run
//!
//! Demonstrates cooperative cancellation: the run is cancelled while the
//! second task is still executing. In-flight work finishes, never-started
//! tasks are captured as canceled, and the result vec is still complete and
//! in input order.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► spawn runner.run([t0, t1, t2, t3, t4]) at concurrency 1
//!   │
//!   └─► controller
//!         ├─► sleep 750ms (t0 finished, t1 in flight)
//!         ├─► runner.cancel_all()
//!         │     ├─► no new index claims
//!         │     └─► t1 finishes its current attempt
//!         └─► t2..t4 come back as captured/canceled
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example cancel_mid_run
//! ```

use std::{sync::Arc, time::Duration};

use conveyor::{Config, Runner, Subscribe, TaskError, TaskFn, TaskRef};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== cancel_mid_run demo ===\n");

    // 1. Configure: strictly sequential so cancellation lands mid-queue.
    let cfg = Config {
        concurrency: 1,
        ..Config::default()
    };

    // 2. Optional: add a subscriber to see events (requires "logging" feature)
    #[cfg(feature = "logging")]
    let subs: Vec<Arc<dyn Subscribe>> = {
        use conveyor::LogWriter;
        vec![Arc::new(LogWriter)]
    };
    #[cfg(not(feature = "logging"))]
    let subs: Vec<Arc<dyn Subscribe>> = Vec::new();

    // 3. Create the runner
    let runner = Arc::new(Runner::new(cfg, subs)?);

    // 4. Five slow tasks, 500ms each
    let tasks: Vec<TaskRef<usize>> = (0..5)
        .map(|i| -> TaskRef<usize> {
            TaskFn::arc(move || async move {
                println!("[task {i}] started");
                tokio::time::sleep(Duration::from_millis(500)).await;
                println!("[task {i}] finished");
                Ok::<_, TaskError>(i)
            })
        })
        .collect();

    // 5. Run in the background
    let run = {
        let runner = Arc::clone(&runner);
        tokio::spawn(async move { runner.run(tasks).await })
    };

    // 6. Cancel while the second task is in flight
    tokio::time::sleep(Duration::from_millis(750)).await;
    println!("\n[controller] cancelling the run...\n");
    runner.cancel_all();

    // 7. The result vec is complete anyway: finished tasks are successes,
    //    never-started tasks are captured as canceled.
    let results = run.await??;
    for (index, outcome) in results.iter().enumerate() {
        println!(
            "[main] results[{index}] status={} canceled={}",
            outcome.status(),
            outcome.is_canceled()
        );
    }

    println!("\n=== demo completed ===");
    Ok(())
}
