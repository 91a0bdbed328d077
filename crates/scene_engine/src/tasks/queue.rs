//! FIFO queue of deferred callbacks

use std::collections::VecDeque;
use std::fmt;

use log::{debug, warn};

use super::error::{QueueError, TaskResult};
use crate::core::config::TaskQueueConfig;

type Task = Box<dyn FnOnce() -> TaskResult>;

/// Whether a queue has work waiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    /// Nothing queued
    Empty,
    /// At least one callback is waiting for the next run
    Pending,
}

/// Queue of zero-argument callbacks, executed in insertion order on demand
///
/// Not thread-safe; producers on other threads must serialize access
/// themselves. A queued callback cannot be cancelled.
pub struct TaskQueue {
    tasks: VecDeque<Task>,
    max_per_run: usize,
}

impl TaskQueue {
    /// Create an empty queue with default configuration
    pub fn new() -> Self {
        Self::with_config(&TaskQueueConfig::default())
    }

    /// Create an empty queue
    pub fn with_config(config: &TaskQueueConfig) -> Self {
        Self {
            tasks: VecDeque::with_capacity(config.initial_capacity),
            max_per_run: config.max_per_run,
        }
    }

    /// Queue a callback that cannot fail
    pub fn queue(&mut self, task: impl FnOnce() + 'static) {
        self.tasks.push_back(Box::new(move || -> TaskResult {
            task();
            Ok(())
        }));
    }

    /// Queue a callback that may fail
    pub fn try_queue(&mut self, task: impl FnOnce() -> TaskResult + 'static) {
        self.tasks.push_back(Box::new(task));
    }

    /// Number of queued callbacks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Current state
    pub fn state(&self) -> QueueState {
        if self.tasks.is_empty() {
            QueueState::Empty
        } else {
            QueueState::Pending
        }
    }

    /// Batch budget used by [`run_batch`](Self::run_batch)
    pub const fn max_per_run(&self) -> usize {
        self.max_per_run
    }

    /// Run every queued callback in order and return how many ran
    ///
    /// Stops at the first failing callback; that callback is consumed and
    /// the ones after it stay queued for the next run.
    pub fn run(&mut self) -> Result<usize, QueueError> {
        self.run_limited(usize::MAX)
    }

    /// Run at most `max` callbacks; the rest stay queued in order
    pub fn run_limited(&mut self, max: usize) -> Result<usize, QueueError> {
        let mut executed = 0;
        while executed < max {
            let Some(task) = self.tasks.pop_front() else {
                break;
            };
            if let Err(source) = task() {
                let remaining = self.tasks.len();
                warn!("Deferred task #{executed} failed, {remaining} task(s) left queued: {source}");
                return Err(QueueError::TaskFailed {
                    position: executed,
                    remaining,
                    source,
                });
            }
            executed += 1;
        }

        if executed > 0 {
            debug!("Ran {executed} deferred task(s), {} still queued", self.tasks.len());
        }
        Ok(executed)
    }

    /// Run up to the configured batch budget
    pub fn run_batch(&mut self) -> Result<usize, QueueError> {
        self.run_limited(self.max_per_run)
    }

    /// Run with a budget computed from the number of queued callbacks
    pub fn run_with(&mut self, budget: impl FnOnce(usize) -> usize) -> Result<usize, QueueError> {
        let max = budget(self.tasks.len());
        self.run_limited(max)
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.tasks.len())
            .field("max_per_run", &self.max_per_run)
            .finish()
    }
}
