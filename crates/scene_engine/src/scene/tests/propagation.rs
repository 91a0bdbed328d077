//! Visibility propagation through a `SceneTree` mixing hideable nodes,
//! hideable controls and plain nodes

use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::logging;
use crate::scene::*;

/// Hideable control that records every effective state change
#[derive(Debug)]
struct CullingControl {
    state: HideState,
    changes: Rc<RefCell<Vec<bool>>>,
}

impl CullingControl {
    fn boxed(changes: &Rc<RefCell<Vec<bool>>>) -> Box<dyn Control> {
        Box::new(Self {
            state: HideState::new(),
            changes: Rc::clone(changes),
        })
    }
}

impl Hideable for CullingControl {
    fn hide_state(&self) -> &HideState {
        &self.state
    }

    fn hide_state_mut(&mut self) -> HideStateMut<'_> {
        HideStateMut::new(&mut self.state)
    }

    fn on_visibility_changed(&mut self, effectively_hidden: bool) {
        self.changes.borrow_mut().push(effectively_hidden);
    }
}

impl Control for CullingControl {
    fn name(&self) -> &str {
        "culling"
    }

    fn as_hideable(&self) -> Option<&dyn Hideable> {
        Some(self)
    }

    fn as_hideable_mut(&mut self) -> Option<&mut dyn Hideable> {
        Some(self)
    }
}

#[derive(Debug)]
struct Spinner;

impl Control for Spinner {
    fn name(&self) -> &str {
        "spinner"
    }
}

fn parents_hidden(tree: &SceneTree, node: crate::foundation::collections::NodeId) -> bool {
    find_capability(tree, node).unwrap().parents_hidden()
}

#[test]
fn test_refresh_copies_parent_state_once() {
    logging::init_for_tests();
    let mut tree = SceneTree::new();
    let parent = tree.create_hideable_node("parent");
    let child = tree.create_hideable_node("child");
    tree.attach_child(parent, child).unwrap();

    hide(&mut tree, parent).unwrap();
    assert_eq!(refresh_parents_hidden(&mut tree, child), Ok(true));
    assert!(parents_hidden(&tree, child));
    assert_eq!(is_effectively_hidden(&tree, child), Ok(true));

    // Revealing the parent does not reach the child until it is refreshed
    reveal(&mut tree, parent).unwrap();
    assert_eq!(is_effectively_hidden(&tree, parent), Ok(false));
    assert!(parents_hidden(&tree, child));

    assert_eq!(refresh_parents_hidden(&mut tree, child), Ok(false));
    assert_eq!(is_effectively_hidden(&tree, child), Ok(false));
}

#[test]
fn test_refresh_is_single_level() {
    let mut tree = SceneTree::new();
    let top = tree.create_hideable_node("top");
    let middle = tree.create_hideable_node("middle");
    let bottom = tree.create_hideable_node("bottom");
    tree.attach_child(top, middle).unwrap();
    tree.attach_child(middle, bottom).unwrap();

    hide(&mut tree, top).unwrap();
    refresh_parents_hidden(&mut tree, middle).unwrap();

    assert!(parents_hidden(&tree, middle));
    assert!(!parents_hidden(&tree, bottom));

    refresh_parents_hidden(&mut tree, bottom).unwrap();
    assert!(parents_hidden(&tree, bottom));
}

#[test]
fn test_root_refresh_clears_cache() {
    let mut tree = SceneTree::new();
    let parent = tree.create_hideable_node("parent");
    let node = tree.create_hideable_node("node");
    tree.attach_child(parent, node).unwrap();
    hide(&mut tree, parent).unwrap();
    refresh_parents_hidden(&mut tree, node).unwrap();
    assert!(parents_hidden(&tree, node));

    tree.detach(node).unwrap();
    assert!(parents_hidden(&tree, node), "detaching alone must not refresh");

    assert_eq!(refresh_parents_hidden(&mut tree, node), Ok(false));
    assert!(!parents_hidden(&tree, node));
}

#[test]
fn test_capability_found_on_control() {
    let changes = Rc::default();
    let mut tree = SceneTree::new();
    let node = tree.create_node("lamp");
    tree.add_control(node, Box::new(Spinner)).unwrap();
    tree.add_control(node, CullingControl::boxed(&changes)).unwrap();

    assert_eq!(capability_source(&tree, node), Some(CapabilitySource::Control(1)));
    assert!(find_capability(&tree, node).is_some());

    hide(&mut tree, node).unwrap();
    assert!(tree.controls(node)[1].as_hideable().unwrap().is_hidden());
}

#[test]
fn test_node_without_capability() {
    let mut tree = SceneTree::new();
    let parent = tree.create_hideable_node("parent");
    let plain = tree.create_node("plain");
    tree.add_control(plain, Box::new(Spinner)).unwrap();
    tree.attach_child(parent, plain).unwrap();

    assert!(find_capability(&tree, plain).is_none());
    assert_eq!(capability_source(&tree, plain), None);
    assert_eq!(
        refresh_parents_hidden(&mut tree, plain),
        Err(SceneError::CapabilityMissing(plain))
    );
    assert_eq!(hide(&mut tree, plain), Err(SceneError::CapabilityMissing(plain)));
    assert_eq!(
        is_effectively_hidden(&tree, plain),
        Err(SceneError::CapabilityMissing(plain))
    );
}

#[test]
fn test_own_state_wins_over_controls() {
    let changes = Rc::default();
    let mut tree = SceneTree::new();
    let node = tree.create_hideable_node("node");
    tree.add_control(node, CullingControl::boxed(&changes)).unwrap();

    assert_eq!(capability_source(&tree, node), Some(CapabilitySource::Node));
    hide(&mut tree, node).unwrap();

    assert!(tree.node(node).unwrap().hide_state().unwrap().is_hidden());
    assert!(!tree.controls(node)[0].as_hideable().unwrap().is_hidden());
}

#[test]
fn test_first_attached_control_wins() {
    let mut tree = SceneTree::new();
    let node = tree.create_node("node");
    tree.add_control(node, Box::new(HideableControl::new("first"))).unwrap();
    tree.add_control(node, Box::new(HideableControl::new("second"))).unwrap();

    assert_eq!(capability_source(&tree, node), Some(CapabilitySource::Control(0)));

    hide(&mut tree, node).unwrap();
    let controls = tree.controls(node);
    assert!(controls[0].as_hideable().unwrap().is_hidden());
    assert!(!controls[1].as_hideable().unwrap().is_hidden());
}

#[test]
fn test_hide_twice_keeps_parent_cache() {
    let mut tree = SceneTree::new();
    let parent = tree.create_hideable_node("parent");
    let node = tree.create_hideable_node("node");
    tree.attach_child(parent, node).unwrap();
    hide(&mut tree, parent).unwrap();
    refresh_parents_hidden(&mut tree, node).unwrap();

    hide(&mut tree, node).unwrap();
    hide(&mut tree, node).unwrap();
    let capability = find_capability(&tree, node).unwrap();
    assert!(capability.is_hidden());
    assert!(capability.parents_hidden());

    reveal(&mut tree, node).unwrap();
    reveal(&mut tree, node).unwrap();
    let capability = find_capability(&tree, node).unwrap();
    assert!(!capability.is_hidden());
    assert!(capability.parents_hidden());
}

#[test]
fn test_callers_cannot_reset_parent_cache() {
    let changes = Rc::default();
    let mut tree = SceneTree::new();
    let parent = tree.create_hideable_node("parent");
    let child = tree.create_node("child");
    tree.add_control(child, CullingControl::boxed(&changes)).unwrap();
    tree.attach_child(parent, child).unwrap();
    hide(&mut tree, parent).unwrap();
    refresh_parents_hidden(&mut tree, child).unwrap();

    let capability = find_capability_mut(&mut tree, child).unwrap();
    let mut view = capability.hide_state_mut();
    view.set_hidden(true);
    view.set_hidden(false);
    assert!(view.get().parents_hidden());
    capability.reveal();

    // A copy of the flags is detached from the node
    let mut copy = *capability.hide_state();
    copy.set_hidden(true);
    assert!(!capability.is_hidden());

    assert!(parents_hidden(&tree, child));
    assert_eq!(is_effectively_hidden(&tree, child), Ok(true));

    reveal(&mut tree, parent).unwrap();
    assert_eq!(refresh_parents_hidden(&mut tree, child), Ok(false));
}

#[test]
fn test_plain_parent_breaks_the_chain() {
    let mut tree = SceneTree::new();
    let top = tree.create_hideable_node("top");
    let plain = tree.create_node("plain");
    let leaf = tree.create_hideable_node("leaf");
    tree.attach_child(top, plain).unwrap();
    tree.attach_child(plain, leaf).unwrap();

    hide(&mut tree, top).unwrap();
    assert_eq!(refresh_parents_hidden(&mut tree, leaf), Ok(false));

    // A hideable control on the plain node repairs the chain
    tree.add_control(plain, Box::new(HideableControl::hidden("bridge")))
        .unwrap();
    assert_eq!(refresh_parents_hidden(&mut tree, leaf), Ok(true));
}

#[test]
fn test_refresh_subtree_goes_top_down() {
    let changes = Rc::default();
    let mut tree = SceneTree::new();
    let root = tree.create_root("root");
    let room = tree.create_hideable_node("room");
    let lamp = tree.create_node("lamp");
    let bulb = tree.create_hideable_node("bulb");
    let rug = tree.create_hideable_node("rug");
    tree.attach_child(root, room).unwrap();
    tree.attach_child(room, lamp).unwrap();
    tree.attach_child(lamp, bulb).unwrap();
    tree.attach_child(room, rug).unwrap();
    tree.add_control(lamp, CullingControl::boxed(&changes)).unwrap();

    hide(&mut tree, room).unwrap();
    assert_eq!(refresh_subtree(&mut tree, root), Ok(4));

    for node in [room, lamp, bulb, rug] {
        assert_eq!(is_effectively_hidden(&tree, node), Ok(true));
    }
    assert_eq!(*changes.borrow(), vec![true]);

    reveal(&mut tree, room).unwrap();
    refresh_subtree(&mut tree, room).unwrap();
    for node in [room, lamp, bulb, rug] {
        assert_eq!(is_effectively_hidden(&tree, node), Ok(false));
    }
    assert_eq!(*changes.borrow(), vec![true, false]);
}

#[test]
fn test_visibility_hook_only_fires_on_flips() {
    let changes = Rc::default();
    let mut tree = SceneTree::new();
    let parent = tree.create_hideable_node("parent");
    let node = tree.create_node("node");
    tree.add_control(node, CullingControl::boxed(&changes)).unwrap();
    tree.attach_child(parent, node).unwrap();

    hide(&mut tree, node).unwrap();
    hide(&mut tree, node).unwrap();
    assert_eq!(*changes.borrow(), vec![true]);

    // Still hidden through the parent after the local reveal
    hide(&mut tree, parent).unwrap();
    refresh_parents_hidden(&mut tree, node).unwrap();
    reveal(&mut tree, node).unwrap();
    assert_eq!(*changes.borrow(), vec![true]);

    reveal(&mut tree, parent).unwrap();
    refresh_parents_hidden(&mut tree, node).unwrap();
    assert_eq!(*changes.borrow(), vec![true, false]);
}

#[test]
fn test_stale_handles() {
    let mut tree = SceneTree::new();
    let node = tree.create_hideable_node("gone");
    tree.remove_node(node).unwrap();

    assert_eq!(refresh_parents_hidden(&mut tree, node), Err(SceneError::NodeNotFound(node)));
    assert_eq!(refresh_subtree(&mut tree, node), Err(SceneError::NodeNotFound(node)));
    assert_eq!(reveal(&mut tree, node), Err(SceneError::NodeNotFound(node)));
}
