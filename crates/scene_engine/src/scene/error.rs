//! Scene errors

use crate::foundation::collections::NodeId;
use thiserror::Error;

/// Errors raised by scene tree and visibility operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The node carries no hideable capability, neither directly nor on a control
    #[error("node {0:?} is not hideable")]
    CapabilityMissing(NodeId),

    /// The handle does not refer to a live node
    #[error("node {0:?} does not exist in the scene")]
    NodeNotFound(NodeId),

    /// Reparenting would make a node its own ancestor
    #[error("cannot attach {child:?} under {parent:?}: it would become its own ancestor")]
    CyclicParent {
        /// Node being moved
        child: NodeId,
        /// Requested new parent
        parent: NodeId,
    },

    /// No control exists at the given attachment index
    #[error("node {node:?} has no control at index {index}")]
    ControlIndexOutOfRange {
        /// Node owning the controls
        node: NodeId,
        /// Requested index
        index: usize,
    },
}
