//! Scene management system
//!
//! Provides the scene tree and the hideable visibility protocol that runs on
//! top of it.
//!
//! ## Architecture
//!
//! ```text
//! Application code (reparent / hide / reveal)
//!      ↓
//! Visibility protocol (hideable)
//!      ↓
//! SceneGraph trait  ←  SceneTree (arena) or a host's own tree
//! ```
//!
//! Visibility is tracked per node that opts in, either by carrying its own
//! hide state or through an attached [`Control`]. Nothing propagates on its
//! own: after structural changes the caller refreshes the affected nodes,
//! parents before children.

mod attachment;
mod control;
mod error;
mod hideable;
mod scene_graph;

#[cfg(test)]
mod tests;

pub use attachment::AttachmentUpdate;
pub use control::{Control, HideableControl};
pub use error::SceneError;
pub use hideable::{
    capability_source, find_capability, find_capability_mut, hide, is_effectively_hidden,
    refresh_parents_hidden, refresh_subtree, reveal, CapabilitySource, HideState, HideStateMut,
    Hideable,
};
pub use scene_graph::{SceneGraph, SceneNode, SceneTree};
