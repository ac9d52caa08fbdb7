//! # Event subscribers for the conveyor runner.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`]
//! fan-out used to observe runtime events broadcast through the internal bus.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   dispatch chains ── publish(Event) ──► Bus ──► runner listener
//!                                                     │
//!                                                SubscriberSet
//!                                              ┌──────┼──────┐
//!                                              ▼      ▼      ▼
//!                                          LogWriter Metrics Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use conveyor::{Subscribe, Event, EventKind};
//! use async_trait::async_trait;
//!
//! struct Metrics;
//!
//! #[async_trait]
//! impl Subscribe for Metrics {
//!     async fn on_event(&self, event: &Event) {
//!         if matches!(event.kind, EventKind::TaskFailed) {
//!             // increment failure counter
//!         }
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
