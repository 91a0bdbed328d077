//! Deferred task queue
//!
//! Key principles:
//! - Callbacks are queued now and executed later, when the owner calls `run`
//! - Execution order is insertion order (FIFO)
//! - Everything happens synchronously on the calling thread
//! - Fail-fast: a failing callback stops the run and the rest stay queued

mod error;
mod queue;

pub use error::{QueueError, TaskError, TaskResult};
pub use queue::{QueueState, TaskQueue};
