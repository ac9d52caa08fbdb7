//! Retry delay policy.
//!
//! ## Contents
//! - [`BackoffPolicy`] how retry delays grow between failed attempts
//!
//! ## Quick wiring
//! ```text
//! Config { backoff: BackoffPolicy, retries, .. }
//!      └─► core::retry::execute_with_retry uses:
//!           - backoff.delay_for(attempt) to schedule the next attempt
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → first=100ms, max=30s (linear ramp:
//!   100ms, 200ms, 300ms, ...).

mod backoff;

pub use backoff::BackoffPolicy;
