//! Runtime core: dispatch and retry.
//!
//! This module contains the embedded implementation of the conveyor runner.
//! The only public API from this module is [`Runner`], which owns the event
//! bus, validates configuration, and drives bounded dispatch with ordered
//! result collection.
//!
//! Internal modules:
//! - [`retry`]: executes one task to a terminal outcome with retries, backoff,
//!   and cancellation checks;
//! - [`runner`]: claim cursor, dispatch chains, completion join, cancellation.

mod retry;
mod runner;

pub use runner::Runner;
