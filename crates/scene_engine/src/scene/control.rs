//! Auxiliary components attached to scene nodes
//!
//! A control extends a node's behavior without the node itself having to
//! carry it. Controls are kept in attachment order, which is also the order
//! used when searching them for a capability.

use std::fmt;

use super::attachment::AttachmentUpdate;
use super::hideable::{HideState, HideStateMut, Hideable};

/// Behavior attached to a scene node
pub trait Control: fmt::Debug {
    /// Human readable name, used in logs
    fn name(&self) -> &str;

    /// The hideable capability this control provides, if any
    fn as_hideable(&self) -> Option<&dyn Hideable> {
        None
    }

    /// Mutable access to the hideable capability, if any
    ///
    /// Must agree with [`as_hideable`](Self::as_hideable).
    fn as_hideable_mut(&mut self) -> Option<&mut dyn Hideable> {
        None
    }

    /// Called when the owning node (or an ancestor) is attached to, detached
    /// from, or moved within a rooted scene
    fn on_attachment(&mut self, _update: AttachmentUpdate) {}
}

/// Control that makes a plain node hideable
#[derive(Debug, Clone, Default)]
pub struct HideableControl {
    name: String,
    state: HideState,
}

impl HideableControl {
    /// Create a visible control
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: HideState::new(),
        }
    }

    /// Create a control that starts out hidden
    pub fn hidden(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: HideState::with_hidden(true),
        }
    }
}

impl Hideable for HideableControl {
    fn hide_state(&self) -> &HideState {
        &self.state
    }

    fn hide_state_mut(&mut self) -> HideStateMut<'_> {
        HideStateMut::new(&mut self.state)
    }
}

impl Control for HideableControl {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_hideable(&self) -> Option<&dyn Hideable> {
        Some(self)
    }

    fn as_hideable_mut(&mut self) -> Option<&mut dyn Hideable> {
        Some(self)
    }
}
