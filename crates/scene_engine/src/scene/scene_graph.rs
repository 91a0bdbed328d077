//! Scene graph trait and implementations
//!
//! [`SceneGraph`] is the read/write view the visibility protocol needs from
//! a tree: parent and children lookups, a node's own hideable state, and the
//! node's controls in attachment order. [`SceneTree`] is the bundled
//! arena-backed implementation; hosts with their own storage can implement
//! the trait instead.

use log::{debug, trace};

use super::attachment::AttachmentUpdate;
use super::control::Control;
use super::error::SceneError;
use super::hideable::{HideState, Hideable};
use crate::core::config::SceneConfig;
use crate::foundation::collections::{NodeId, NodeMap};

/// Tree access used by the visibility protocol
///
/// Queries on a handle that is not part of the graph return `None` or an
/// empty slice.
///
/// `parent` and `children` must describe an acyclic tree: following
/// `children` from any node never reaches that node again, and every child
/// reports the node as its parent. Sweeps such as
/// [`refresh_subtree`](super::refresh_subtree) rely on this to terminate and
/// skip any node they reach twice.
pub trait SceneGraph {
    /// Whether the handle refers to a live node
    fn contains(&self, node: NodeId) -> bool;

    /// Parent of a node, `None` for roots
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Children of a node in order; never the node itself or an ancestor
    fn children(&self, node: NodeId) -> &[NodeId];

    /// Hideable state carried by the node itself (not by its controls)
    fn own_hideable(&self, node: NodeId) -> Option<&dyn Hideable>;

    /// Mutable access to the node's own hideable state
    fn own_hideable_mut(&mut self, node: NodeId) -> Option<&mut dyn Hideable>;

    /// Controls attached to the node, in attachment order
    fn controls(&self, node: NodeId) -> &[Box<dyn Control>];

    /// Mutable access to the node's controls
    fn controls_mut(&mut self, node: NodeId) -> &mut [Box<dyn Control>];
}

/// A node stored in a [`SceneTree`]
#[derive(Debug)]
pub struct SceneNode {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    hide_state: Option<HideState>,
    controls: Vec<Box<dyn Control>>,
    is_root: bool,
}

impl SceneNode {
    fn new(name: String, hide_state: Option<HideState>) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
            hide_state,
            controls: Vec::new(),
            is_root: false,
        }
    }

    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent handle
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles in order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Hide state carried by the node itself
    pub const fn hide_state(&self) -> Option<&HideState> {
        self.hide_state.as_ref()
    }

    /// Attached controls in attachment order
    pub fn controls(&self) -> &[Box<dyn Control>] {
        &self.controls
    }

    /// Whether this node is marked as a scene root
    pub const fn is_root(&self) -> bool {
        self.is_root
    }
}

/// Arena-backed scene tree
///
/// Nodes are addressed by [`NodeId`] handles. Structural edits keep parent
/// and child links consistent and refuse to create cycles; they never touch
/// hidden state.
#[derive(Debug)]
pub struct SceneTree {
    nodes: NodeMap<SceneNode>,
}

impl SceneTree {
    /// Create an empty tree with default configuration
    pub fn new() -> Self {
        Self::with_config(&SceneConfig::default())
    }

    /// Create an empty tree
    pub fn with_config(config: &SceneConfig) -> Self {
        Self {
            nodes: NodeMap::with_capacity_and_key(config.initial_capacity),
        }
    }

    /// Add a detached node without the hideable capability
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeId {
        self.nodes.insert(SceneNode::new(name.into(), None))
    }

    /// Add a detached node that carries its own hide state
    pub fn create_hideable_node(&mut self, name: impl Into<String>) -> NodeId {
        self.nodes.insert(SceneNode::new(name.into(), Some(HideState::new())))
    }

    /// Add a plain node marked as a scene root
    pub fn create_root(&mut self, name: impl Into<String>) -> NodeId {
        let mut node = SceneNode::new(name.into(), None);
        node.is_root = true;
        self.nodes.insert(node)
    }

    /// Look up a node
    pub fn node(&self, node: NodeId) -> Option<&SceneNode> {
        self.nodes.get(node)
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First child of `parent` with the given name
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.nodes.get(child).is_some_and(|node| node.name == name))
    }

    /// First node named `name` in the subtree of `from`, parents before
    /// children
    ///
    /// `from` itself is included in the search.
    pub fn find_descendant(&self, from: NodeId, name: &str) -> Option<NodeId> {
        if !self.nodes.contains_key(from) {
            return None;
        }
        self.subtree(from)
            .into_iter()
            .find(|&id| self.nodes.get(id).is_some_and(|node| node.name == name))
    }

    /// Ancestors of a node, nearest first
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |&current| self.parent(current))
    }

    /// Whether the node or one of its ancestors is a scene root
    ///
    /// Walks the whole ancestor chain; reparenting refuses cycles, so the
    /// walk always ends at a parentless node.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let Some(start) = self.nodes.get(node) else {
            return false;
        };
        start.is_root
            || self
                .ancestors(node)
                .any(|ancestor| self.nodes.get(ancestor).is_some_and(SceneNode::is_root))
    }

    /// Mark or unmark a node as a scene root
    ///
    /// Returns the attachment transition of the node, if it changed.
    pub fn set_root(
        &mut self,
        node: NodeId,
        is_root: bool,
    ) -> Result<Option<AttachmentUpdate>, SceneError> {
        let was_attached = self.is_attached(node);
        self.nodes
            .get_mut(node)
            .ok_or(SceneError::NodeNotFound(node))?
            .is_root = is_root;
        let is_attached = self.is_attached(node);

        if was_attached == is_attached {
            return Ok(None);
        }
        let update = AttachmentUpdate::from_transition(was_attached, is_attached);
        if let Some(update) = update {
            self.dispatch_attachment(node, update);
        }
        Ok(update)
    }

    /// Attach `child` as the last child of `parent`
    pub fn attach_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
    ) -> Result<Option<AttachmentUpdate>, SceneError> {
        self.set_parent(child, Some(parent))
    }

    /// Detach a node (and its subtree) from its parent
    pub fn detach(&mut self, child: NodeId) -> Result<Option<AttachmentUpdate>, SceneError> {
        self.set_parent(child, None)
    }

    /// Move a node under a new parent, or detach it with `None`
    ///
    /// Controls of the moved subtree are told about the attachment
    /// transition, which is also returned. Hidden state is left untouched:
    /// callers refresh the moved subtree themselves.
    pub fn set_parent(
        &mut self,
        child: NodeId,
        new_parent: Option<NodeId>,
    ) -> Result<Option<AttachmentUpdate>, SceneError> {
        let old_parent = self
            .nodes
            .get(child)
            .ok_or(SceneError::NodeNotFound(child))?
            .parent;

        if let Some(parent) = new_parent {
            if !self.nodes.contains_key(parent) {
                return Err(SceneError::NodeNotFound(parent));
            }
            if parent == child || self.ancestors(parent).any(|ancestor| ancestor == child) {
                return Err(SceneError::CyclicParent { child, parent });
            }
        }
        if old_parent == new_parent {
            return Ok(None);
        }

        let was_attached = self.is_attached(child);

        if let Some(old) = old_parent.and_then(|old| self.nodes.get_mut(old)) {
            old.children.retain(|&c| c != child);
        }
        if let Some(parent) = new_parent.and_then(|parent| self.nodes.get_mut(parent)) {
            parent.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = new_parent;
        }

        let is_attached = self.is_attached(child);
        let update = AttachmentUpdate::from_transition(was_attached, is_attached);
        debug!("Moved {child:?} from {old_parent:?} to {new_parent:?} ({update:?})");

        if let Some(update) = update {
            self.dispatch_attachment(child, update);
        }
        Ok(update)
    }

    /// Remove a node and its whole subtree
    ///
    /// The subtree is detached first so its controls see a
    /// [`AttachmentUpdate::Detach`]. Returns the number of nodes removed.
    pub fn remove_node(&mut self, node: NodeId) -> Result<usize, SceneError> {
        if self.nodes.get(node).ok_or(SceneError::NodeNotFound(node))?.is_root {
            self.set_root(node, false)?;
        }
        self.set_parent(node, None)?;

        let subtree = self.subtree(node);
        for &id in &subtree {
            self.nodes.remove(id);
        }
        debug!("Removed {} node(s) rooted at {node:?}", subtree.len());
        Ok(subtree.len())
    }

    /// Attach a control to a node, returning its attachment index
    pub fn add_control(
        &mut self,
        node: NodeId,
        control: Box<dyn Control>,
    ) -> Result<usize, SceneError> {
        let entry = self
            .nodes
            .get_mut(node)
            .ok_or(SceneError::NodeNotFound(node))?;
        trace!("Adding control '{}' to {node:?}", control.name());
        entry.controls.push(control);
        Ok(entry.controls.len() - 1)
    }

    /// Remove the control at `index`; later controls shift down by one
    pub fn remove_control(
        &mut self,
        node: NodeId,
        index: usize,
    ) -> Result<Box<dyn Control>, SceneError> {
        let entry = self
            .nodes
            .get_mut(node)
            .ok_or(SceneError::NodeNotFound(node))?;
        if index >= entry.controls.len() {
            return Err(SceneError::ControlIndexOutOfRange { node, index });
        }
        Ok(entry.controls.remove(index))
    }

    /// Node and all descendants, parents before children
    fn subtree(&self, node: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        order
    }

    fn dispatch_attachment(&mut self, node: NodeId, update: AttachmentUpdate) {
        let mut order = self.subtree(node);
        if update.children_first() {
            order.reverse();
        }

        for id in order {
            if let Some(entry) = self.nodes.get_mut(id) {
                for control in &mut entry.controls {
                    trace!("{update:?} -> control '{}' on {id:?}", control.name());
                    control.on_attachment(update);
                }
            }
        }
    }
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph for SceneTree {
    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.parent
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        match self.nodes.get(node) {
            Some(entry) => &entry.children,
            None => &[],
        }
    }

    fn own_hideable(&self, node: NodeId) -> Option<&dyn Hideable> {
        self.nodes
            .get(node)?
            .hide_state
            .as_ref()
            .map(|state| state as &dyn Hideable)
    }

    fn own_hideable_mut(&mut self, node: NodeId) -> Option<&mut dyn Hideable> {
        self.nodes
            .get_mut(node)?
            .hide_state
            .as_mut()
            .map(|state| state as &mut dyn Hideable)
    }

    fn controls(&self, node: NodeId) -> &[Box<dyn Control>] {
        match self.nodes.get(node) {
            Some(entry) => &entry.controls,
            None => &[],
        }
    }

    fn controls_mut(&mut self, node: NodeId) -> &mut [Box<dyn Control>] {
        match self.nodes.get_mut(node) {
            Some(entry) => &mut entry.controls,
            None => &mut [],
        }
    }
}
