//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Periodic tasks (elapsed-time ticker)
//! - Calculator bindings (web only)

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
pub(crate) mod manual;

#[cfg(not(target_arch = "wasm32"))]
pub use native::{LocalScheduler, LocalTask, SystemClock};
#[cfg(target_arch = "wasm32")]
pub use web::{IntervalScheduler, IntervalTask, SystemClock};

/// Source of wall-clock time in milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Runs a callback at a fixed period until the returned task is dropped
pub trait Scheduler {
    /// Dropping the task cancels it; no tick runs after the drop returns.
    type Task;

    fn every(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> Self::Task;
}
