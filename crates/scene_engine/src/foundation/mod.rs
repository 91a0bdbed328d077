//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Collections and handle types
//! - Logging utilities

pub mod collections;
pub mod logging;
