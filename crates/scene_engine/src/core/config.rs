//! # Unified Configuration System
//!
//! All configuration structures for the engine live here. Each subsystem gets
//! its own section and the sections are grouped under [`EngineConfig`], which
//! is what applications load from disk.
//!
//! ## Configuration Categories
//!
//! - **Logging Config**: Default log level for `env_logger`
//! - **Scene Config**: Scene tree storage and ancestor walk limits
//! - **Task Queue Config**: Deferred task queue sizing and batch budget

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

/// # Logging Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level (`error`, `warn`, `info`, `debug`, `trace` or `off`)
    pub level: String,
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self {
            level: "info".to_string(),
        }
    }

    /// Set log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Parsed level filter, falling back to `Info` for unknown names
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level
            .parse::<log::LevelFilter>()
            .map(|_| ())
            .map_err(|_| ConfigError::Invalid(format!("unknown log level: {}", self.level)))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Scene Configuration
///
/// Storage settings for [`SceneTree`](crate::scene::SceneTree).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of node slots reserved up front
    pub initial_capacity: usize,
}

impl SceneConfig {
    /// Create a new scene configuration
    pub fn new() -> Self {
        Self {
            initial_capacity: 64,
        }
    }

    /// Set the number of node slots reserved up front
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Task Queue Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskQueueConfig {
    /// Number of task slots reserved up front
    pub initial_capacity: usize,
    /// Tasks executed by a single [`run_batch`](crate::tasks::TaskQueue::run_batch)
    pub max_per_run: usize,
}

impl TaskQueueConfig {
    /// Create a new task queue configuration
    pub fn new() -> Self {
        Self {
            initial_capacity: 16,
            max_per_run: 300,
        }
    }

    /// Set the number of task slots reserved up front
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the batch budget
    pub fn with_max_per_run(mut self, max_per_run: usize) -> Self {
        self.max_per_run = max_per_run;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_per_run == 0 {
            return Err(ConfigError::Invalid(
                "max_per_run must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TaskQueueConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Engine Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
/// This is the main configuration structure applications should use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Scene tree configuration
    pub scene: SceneConfig,
    /// Deferred task queue configuration
    pub tasks: TaskQueueConfig,
}

impl EngineConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.validate()?;
        self.tasks.validate()?;
        Ok(())
    }
}

impl Config for EngineConfig {}
