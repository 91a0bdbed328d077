//! Specialized collection types

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to a node stored in a [`SceneTree`](crate::scene::SceneTree)
    ///
    /// Handles stay valid until the node is removed; a removed handle is never
    /// reused for a different node.
    pub struct NodeId;
}

/// Handle-based map using slot map for stable node references
pub type NodeMap<T> = SlotMap<NodeId, T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_handle_is_not_reused() {
        let mut map: NodeMap<&str> = NodeMap::with_key();
        let first = map.insert("first");
        map.remove(first);
        let second = map.insert("second");

        assert_ne!(first, second);
        assert!(map.get(first).is_none());
        assert_eq!(map.get(second), Some(&"second"));
    }
}
