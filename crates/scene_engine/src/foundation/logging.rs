//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

use crate::core::config::LoggingConfig;

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging with the configured level as the default filter
///
/// `RUST_LOG` still wins for modules it names. Returns `false` if a logger
/// was already installed.
pub fn init_with_config(config: &LoggingConfig) -> bool {
    env_logger::Builder::from_default_env()
        .filter_level(config.level_filter())
        .try_init()
        .is_ok()
}

/// Initialize logging for unit tests (captured by the test harness)
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
