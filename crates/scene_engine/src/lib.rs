//! # Scene Engine
//!
//! Visibility propagation for scene trees plus a deferred task queue.
//!
//! ## Features
//!
//! - **Hideable protocol**: hide and reveal nodes instead of detaching them,
//!   with hidden state inherited from hideable parents
//! - **Controls**: attach behavior (including the hideable capability) to a
//!   plain node without changing the node itself
//! - **Arena scene tree**: stable handles, cycle-free reparenting and
//!   attachment notifications
//! - **Deferred tasks**: FIFO callbacks flushed on demand
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), SceneError> {
//!     let mut tree = SceneTree::new();
//!     let room = tree.create_hideable_node("room");
//!     let lamp = tree.create_hideable_node("lamp");
//!     tree.attach_child(room, lamp)?;
//!
//!     hide(&mut tree, room)?;
//!     // Propagation is lazy: refresh parents before children
//!     refresh_parents_hidden(&mut tree, lamp)?;
//!
//!     assert!(is_effectively_hidden(&tree, lamp)?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod config;
pub mod foundation;
pub mod scene;
pub mod tasks;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{Config, ConfigError, EngineConfig},
        foundation::collections::NodeId,
        scene::{
            find_capability, hide, is_effectively_hidden, refresh_parents_hidden,
            refresh_subtree, reveal, AttachmentUpdate, Control, HideState, HideStateMut,
            Hideable, HideableControl, SceneError, SceneGraph, SceneTree,
        },
        tasks::{QueueError, TaskError, TaskQueue, TaskResult},
    };
}
