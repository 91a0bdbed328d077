//! Task queue errors

use thiserror::Error;

use crate::scene::SceneError;

/// Outcome of a fallible deferred callback
pub type TaskResult = Result<(), TaskError>;

/// Error returned by a deferred callback
#[derive(Error, Debug)]
pub enum TaskError {
    /// Failure described by a message
    #[error("{0}")]
    Message(String),

    /// Scene operation failed inside the callback
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),

    /// Any other error
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl TaskError {
    /// Create a message error
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Error returned by a queue run
#[derive(Error, Debug)]
pub enum QueueError {
    /// A callback failed; the callbacks queued after it were not run
    #[error("deferred task #{position} failed, {remaining} task(s) left queued: {source}")]
    TaskFailed {
        /// Zero-based position of the failed callback within this run
        position: usize,
        /// Callbacks still queued after the failure
        remaining: usize,
        /// Error returned by the callback
        #[source]
        source: TaskError,
    },
}
