//! Attachment transitions
//!
//! A node is attached when it, or one of its ancestors, is marked as a scene
//! root. Reparenting compares the attachment status before and after the move
//! and reports the transition to the controls of the moved subtree.

/// Change in a node's attachment to a rooted scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentUpdate {
    /// The node became reachable from a root, through itself or an ancestor
    Attach,
    /// The node is no longer reachable from a root
    Detach,
    /// The node stayed attached but changed parents
    Change,
}

impl AttachmentUpdate {
    /// Transition from the previous to the current attachment status
    ///
    /// Returns `None` when a detached node stays detached.
    pub const fn from_transition(was_attached: bool, is_attached: bool) -> Option<Self> {
        match (was_attached, is_attached) {
            (true, true) => Some(Self::Change),
            (true, false) => Some(Self::Detach),
            (false, true) => Some(Self::Attach),
            (false, false) => None,
        }
    }

    /// Whether descendants are notified before the node itself
    ///
    /// Detaching tears down children first; attaching and moving set up the
    /// parent first.
    pub const fn children_first(self) -> bool {
        matches!(self, Self::Detach)
    }
}
