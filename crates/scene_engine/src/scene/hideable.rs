//! Hideable visibility protocol
//!
//! A node can be hidden or revealed as an alternative to detaching it from
//! the scene and attaching it again later. Hiding a node must also hide
//! everything below it, so each hideable keeps two flags:
//!
//! - `hidden`, set locally through [`Hideable::hide`] / [`Hideable::reveal`]
//! - `parents_hidden`, a cache of the parent's effective state, written only
//!   by [`refresh_parents_hidden`]
//!
//! A node is *effectively hidden* when either flag is set.
//!
//! The capability is found on a node in two steps: the node's own state
//! first, then its controls in attachment order (see [`find_capability`]).
//!
//! ## Refresh contract
//!
//! Propagation is lazy. `hide`, `reveal` and reparenting never touch other
//! nodes, so `parents_hidden` may be stale until the caller refreshes. After
//! a batch of structural changes, refresh every affected hideable node
//! **parents before children**; [`refresh_subtree`] does exactly that for a
//! whole subtree when asked to.
//!
//! A refresh only looks at the immediate parent. If the parent carries no
//! capability the chain is broken and the child's `parents_hidden` becomes
//! `false`, so every ancestor that should forward hiding must be hideable
//! itself or carry a hideable control.

use log::{debug, trace, warn};
use slotmap::SecondaryMap;

use super::error::SceneError;
use super::scene_graph::SceneGraph;
use crate::foundation::collections::NodeId;

/// Hidden flags of a single hideable node or control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HideState {
    hidden: bool,
    parents_hidden: bool,
}

impl HideState {
    /// Visible state with no hidden parents
    pub const fn new() -> Self {
        Self {
            hidden: false,
            parents_hidden: false,
        }
    }

    /// State with the local flag preset
    pub const fn with_hidden(hidden: bool) -> Self {
        Self {
            hidden,
            parents_hidden: false,
        }
    }

    /// Local hidden flag
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Set the local hidden flag
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Cached effective state of the parent as of the last refresh
    pub const fn parents_hidden(&self) -> bool {
        self.parents_hidden
    }

    pub(crate) fn set_parents_hidden(&mut self, parents_hidden: bool) {
        self.parents_hidden = parents_hidden;
    }

    /// `hidden || parents_hidden`
    pub const fn is_effectively_hidden(&self) -> bool {
        self.hidden || self.parents_hidden
    }
}

/// Writable view of a [`HideState`] owned by a node or control
///
/// Only the local flag can be changed through the view. It cannot be
/// dereferenced into the state it wraps, so a capability reached through a
/// graph can never have its `parents_hidden` cache overwritten or reset:
///
/// ```compile_fail
/// use scene_engine::prelude::*;
/// use scene_engine::scene::find_capability_mut;
///
/// let mut tree = SceneTree::new();
/// let node = tree.create_hideable_node("node");
/// let capability = find_capability_mut(&mut tree, node).unwrap();
/// *capability.hide_state_mut() = HideState::new();
/// ```
///
/// The cache setter is private to the refresh functions:
///
/// ```compile_fail
/// use scene_engine::prelude::*;
/// use scene_engine::scene::find_capability_mut;
///
/// let mut tree = SceneTree::new();
/// let node = tree.create_hideable_node("node");
/// let capability = find_capability_mut(&mut tree, node).unwrap();
/// capability.hide_state_mut().set_parents_hidden(false);
/// ```
#[derive(Debug)]
pub struct HideStateMut<'a> {
    state: &'a mut HideState,
}

impl<'a> HideStateMut<'a> {
    /// Wrap the state a [`Hideable`] implementor owns
    pub fn new(state: &'a mut HideState) -> Self {
        Self { state }
    }

    /// Read the wrapped flags
    pub fn get(&self) -> &HideState {
        self.state
    }

    /// Set the local hidden flag
    pub fn set_hidden(&mut self, hidden: bool) {
        self.state.set_hidden(hidden);
    }

    pub(crate) fn set_parents_hidden(&mut self, parents_hidden: bool) {
        self.state.set_parents_hidden(parents_hidden);
    }
}

/// Capability for nodes (or controls) that can be hidden and revealed
///
/// Implementors only expose their [`HideState`]; everything else is
/// provided. `parents_hidden` can be read through the trait but only the
/// refresh functions in this module can write it, which is why the mutable
/// accessor hands out a [`HideStateMut`] view instead of the state itself.
///
/// ```
/// use scene_engine::prelude::*;
///
/// struct Door {
///     state: HideState,
/// }
///
/// impl Hideable for Door {
///     fn hide_state(&self) -> &HideState {
///         &self.state
///     }
///
///     fn hide_state_mut(&mut self) -> HideStateMut<'_> {
///         HideStateMut::new(&mut self.state)
///     }
/// }
///
/// let mut door = Door { state: HideState::new() };
/// door.hide();
/// assert!(door.is_effectively_hidden());
/// ```
pub trait Hideable {
    /// Current flags
    fn hide_state(&self) -> &HideState;

    /// Writable view of the flags
    fn hide_state_mut(&mut self) -> HideStateMut<'_>;

    /// Called by the graph level [`hide`], [`reveal`] and
    /// [`refresh_parents_hidden`] when the effective state flips
    ///
    /// Hiding may mean changing culling, removing physics bodies and so on.
    fn on_visibility_changed(&mut self, _effectively_hidden: bool) {}

    /// Local hidden flag
    fn is_hidden(&self) -> bool {
        self.hide_state().is_hidden()
    }

    /// Cached effective state of the parent
    fn parents_hidden(&self) -> bool {
        self.hide_state().parents_hidden()
    }

    /// Whether this node is hidden either locally or through its parents
    fn is_effectively_hidden(&self) -> bool {
        self.hide_state().is_effectively_hidden()
    }

    /// Mark this node hidden. Children are not recomputed.
    fn hide(&mut self) {
        self.hide_state_mut().set_hidden(true);
    }

    /// Clear the local hidden flag. Children are not recomputed.
    fn reveal(&mut self) {
        self.hide_state_mut().set_hidden(false);
    }
}

impl Hideable for HideState {
    fn hide_state(&self) -> &HideState {
        self
    }

    fn hide_state_mut(&mut self) -> HideStateMut<'_> {
        HideStateMut::new(self)
    }
}

/// Where a node's hideable capability lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilitySource {
    /// The node carries the state itself
    Node,
    /// The control at this attachment index provides it
    Control(usize),
}

/// Locate the capability: the node itself first, then the first hideable
/// control in attachment order
pub fn capability_source<G>(graph: &G, node: NodeId) -> Option<CapabilitySource>
where
    G: SceneGraph + ?Sized,
{
    if graph.own_hideable(node).is_some() {
        return Some(CapabilitySource::Node);
    }
    graph
        .controls(node)
        .iter()
        .position(|control| control.as_hideable().is_some())
        .map(CapabilitySource::Control)
}

/// The node's hideable capability, if it has one
pub fn find_capability<G>(graph: &G, node: NodeId) -> Option<&dyn Hideable>
where
    G: SceneGraph + ?Sized,
{
    match capability_source(graph, node)? {
        CapabilitySource::Node => graph.own_hideable(node),
        CapabilitySource::Control(index) => graph.controls(node).get(index)?.as_hideable(),
    }
}

/// Mutable twin of [`find_capability`]
pub fn find_capability_mut<G>(graph: &mut G, node: NodeId) -> Option<&mut dyn Hideable>
where
    G: SceneGraph + ?Sized,
{
    match capability_source(&*graph, node)? {
        CapabilitySource::Node => graph.own_hideable_mut(node),
        CapabilitySource::Control(index) => {
            graph.controls_mut(node).get_mut(index)?.as_hideable_mut()
        }
    }
}

fn require_capability<G>(graph: &mut G, node: NodeId) -> Result<&mut dyn Hideable, SceneError>
where
    G: SceneGraph + ?Sized,
{
    if !graph.contains(node) {
        return Err(SceneError::NodeNotFound(node));
    }
    find_capability_mut(graph, node).ok_or(SceneError::CapabilityMissing(node))
}

/// Effective hidden state of a node
pub fn is_effectively_hidden<G>(graph: &G, node: NodeId) -> Result<bool, SceneError>
where
    G: SceneGraph + ?Sized,
{
    if !graph.contains(node) {
        return Err(SceneError::NodeNotFound(node));
    }
    find_capability(graph, node)
        .map(|capability| capability.is_effectively_hidden())
        .ok_or(SceneError::CapabilityMissing(node))
}

/// Hide a node. Descendants keep their cached state until refreshed.
pub fn hide<G>(graph: &mut G, node: NodeId) -> Result<(), SceneError>
where
    G: SceneGraph + ?Sized,
{
    set_hidden(graph, node, true)
}

/// Reveal a node. Descendants keep their cached state until refreshed.
pub fn reveal<G>(graph: &mut G, node: NodeId) -> Result<(), SceneError>
where
    G: SceneGraph + ?Sized,
{
    set_hidden(graph, node, false)
}

fn set_hidden<G>(graph: &mut G, node: NodeId, hidden: bool) -> Result<(), SceneError>
where
    G: SceneGraph + ?Sized,
{
    let capability = require_capability(graph, node)?;
    let was_hidden = capability.is_effectively_hidden();
    if hidden {
        capability.hide();
    } else {
        capability.reveal();
    }
    notify_if_changed(capability, was_hidden);
    Ok(())
}

/// Recompute `parents_hidden` of `node` from its immediate parent
///
/// Sets it to the parent's effective state when the parent is hideable, and
/// to `false` for roots and for parents without the capability. Children are
/// not visited. Returns the new `parents_hidden` value.
pub fn refresh_parents_hidden<G>(graph: &mut G, node: NodeId) -> Result<bool, SceneError>
where
    G: SceneGraph + ?Sized,
{
    if !graph.contains(node) {
        return Err(SceneError::NodeNotFound(node));
    }
    if capability_source(&*graph, node).is_none() {
        return Err(SceneError::CapabilityMissing(node));
    }

    let parent = graph.parent(node);
    let inherited = match parent {
        Some(parent) => match find_capability(&*graph, parent) {
            Some(capability) => capability.is_effectively_hidden(),
            None => {
                trace!("Parent {parent:?} of {node:?} is not hideable, hiding chain is broken");
                false
            }
        },
        None => false,
    };

    let capability = require_capability(graph, node)?;
    let was_hidden = capability.is_effectively_hidden();
    capability.hide_state_mut().set_parents_hidden(inherited);
    notify_if_changed(capability, was_hidden);

    debug!("Refreshed {node:?}: parents_hidden = {inherited}");
    Ok(inherited)
}

/// Refresh every hideable node of a subtree, parents before children
///
/// Nodes without the capability are skipped (their hideable children see a
/// broken chain). Returns the number of nodes refreshed. This is an explicit
/// batch operation; nothing calls it implicitly.
///
/// The graph's `children` links must form a tree (see [`SceneGraph`]). A
/// node reached a second time through a malformed host graph is logged and
/// not visited again, so the sweep still ends.
pub fn refresh_subtree<G>(graph: &mut G, root: NodeId) -> Result<usize, SceneError>
where
    G: SceneGraph + ?Sized,
{
    if !graph.contains(root) {
        return Err(SceneError::NodeNotFound(root));
    }

    let mut refreshed = 0;
    let mut visited = SecondaryMap::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if visited.insert(node, ()).is_some() {
            warn!("{node:?} reached twice under {root:?}, children links are not a tree");
            continue;
        }
        if capability_source(&*graph, node).is_some() {
            refresh_parents_hidden(graph, node)?;
            refreshed += 1;
        }
        stack.extend(graph.children(node).iter().rev().copied());
    }

    debug!("Refreshed {refreshed} hideable node(s) under {root:?}");
    Ok(refreshed)
}

fn notify_if_changed(capability: &mut dyn Hideable, was_hidden: bool) {
    let now_hidden = capability.is_effectively_hidden();
    if now_hidden != was_hidden {
        capability.on_visibility_changed(now_hidden);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_state_is_or_of_flags() {
        for (hidden, parents_hidden) in [(false, false), (true, false), (false, true), (true, true)] {
            let mut state = HideState::with_hidden(hidden);
            state.set_parents_hidden(parents_hidden);

            assert_eq!(state.is_effectively_hidden(), hidden || parents_hidden);
            assert_eq!(Hideable::is_effectively_hidden(&state), hidden || parents_hidden);
        }
    }

    #[test]
    fn test_default_state_is_visible() {
        let state = HideState::default();
        assert_eq!(state, HideState::new());
        assert!(!state.is_hidden());
        assert!(!state.parents_hidden());
    }

    #[test]
    fn test_view_writes_only_the_local_flag() {
        let mut state = HideState::new();
        state.set_parents_hidden(true);

        let mut view = state.hide_state_mut();
        view.set_hidden(true);
        assert!(view.get().is_hidden());
        view.set_hidden(false);
        assert!(view.get().parents_hidden());

        assert_eq!(state, {
            let mut expected = HideState::with_hidden(false);
            expected.set_parents_hidden(true);
            expected
        });
    }

    #[test]
    fn test_hide_and_reveal_are_idempotent() {
        let mut state = HideState::new();
        state.set_parents_hidden(true);

        state.hide();
        state.hide();
        assert!(state.is_hidden());
        assert!(state.parents_hidden());

        state.reveal();
        state.reveal();
        assert!(!state.is_hidden());
        assert!(state.parents_hidden());

        let mut visible = HideState::new();
        visible.reveal();
        assert!(!visible.is_hidden());
        assert!(!visible.parents_hidden());
    }
}
