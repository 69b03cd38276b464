//! Sorted sequence of virtual nodes and the lookup both rings share.
//!
//! A `Continuum` is immutable once built. Rings produce a new one on every
//! mutation and swap it in under their write lock, so readers only ever see
//! a fully sorted sequence.

use crate::vnode::VirtualNode;

#[derive(Debug, Clone, Default)]
pub(crate) struct Continuum {
    vnodes: Vec<VirtualNode>,
}

impl Continuum {
    /// Sorts `vnodes` ascending by position.
    ///
    /// The sort is stable: vnodes that collide on a position keep their
    /// insertion order, and lookups resolve to the earliest one.
    pub(crate) fn from_unsorted(mut vnodes: Vec<VirtualNode>) -> Self {
        vnodes.sort_by_key(|vnode| vnode.position);
        Self { vnodes }
    }

    /// Returns a new continuum holding the current vnodes plus `extra`.
    pub(crate) fn extended(&self, extra: Vec<VirtualNode>) -> Self {
        let mut vnodes = Vec::with_capacity(self.vnodes.len() + extra.len());
        vnodes.extend_from_slice(&self.vnodes);
        vnodes.extend(extra);
        Self::from_unsorted(vnodes)
    }

    /// Finds the first vnode at or clockwise after `position`.
    ///
    /// Positions past the last vnode wrap around to the first one. An empty
    /// continuum has no owner for any position.
    ///
    /// # Performance
    /// - **Time**: O(log n) binary search
    pub(crate) fn locate(&self, position: u32) -> Option<&VirtualNode> {
        let idx = self.vnodes.partition_point(|vnode| vnode.position < position);
        self.vnodes.get(idx).or_else(|| self.vnodes.first())
    }

    pub(crate) fn len(&self) -> usize {
        self.vnodes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.vnodes.is_empty()
    }

    pub(crate) fn as_slice(&self) -> &[VirtualNode] {
        &self.vnodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeId;

    fn vnode(position: u32, owner: &str) -> VirtualNode {
        VirtualNode::new(position, NodeId::from(owner))
    }

    fn owner_at(continuum: &Continuum, position: u32) -> Option<&str> {
        continuum.locate(position).map(|v| v.node_id.as_str())
    }

    #[test]
    fn test_empty_has_no_owner() {
        let continuum = Continuum::default();
        assert!(continuum.is_empty());
        assert_eq!(owner_at(&continuum, 0), None);
        assert_eq!(owner_at(&continuum, u32::MAX), None);
    }

    #[test]
    fn test_sorted_numerically() {
        let continuum = Continuum::from_unsorted(vec![
            vnode(30, "c"),
            vnode(4, "a"),
            vnode(100, "d"),
            vnode(9, "b"),
        ]);
        let positions: Vec<u32> = continuum.as_slice().iter().map(|v| v.position).collect();
        assert_eq!(positions, vec![4, 9, 30, 100]);
    }

    #[test]
    fn test_locate_exact_next_and_wrap() {
        let vnodes = vec![vnode(10, "a"), vnode(20, "b"), vnode(30, "c")];
        let continuum = Continuum::from_unsorted(vnodes);

        assert_eq!(owner_at(&continuum, 0), Some("a"));
        assert_eq!(owner_at(&continuum, 10), Some("a")); // exact hit
        assert_eq!(owner_at(&continuum, 11), Some("b"));
        assert_eq!(owner_at(&continuum, 30), Some("c"));
        assert_eq!(owner_at(&continuum, 31), Some("a")); // wraps
        assert_eq!(owner_at(&continuum, u32::MAX), Some("a"));
    }

    #[test]
    fn test_collision_resolves_to_first_inserted() {
        let continuum = Continuum::from_unsorted(vec![vnode(50, "first"), vnode(50, "second")]);
        assert_eq!(continuum.len(), 2);
        assert_eq!(owner_at(&continuum, 40), Some("first"));
    }

    #[test]
    fn test_extended_keeps_existing_entries() {
        let base = Continuum::from_unsorted(vec![vnode(10, "a"), vnode(30, "a")]);
        let grown = base.extended(vec![vnode(20, "b"), vnode(10, "b")]);

        assert_eq!(base.len(), 2);
        assert_eq!(grown.len(), 4);
        assert_eq!(owner_at(&grown, 15), Some("b"));
        // Existing vnode wins the tie at 10.
        assert_eq!(owner_at(&grown, 10), Some("a"));
    }
}
