//! Ring topology views.
//!
//! Computes how much of the 32-bit ring each physical node owns. A virtual
//! node owns the arc from its predecessor (exclusive) up to its own position
//! (inclusive); the first vnode's arc wraps around from the last one.

use std::collections::BTreeMap;

use crate::node::NodeId;
use crate::ring::Lookup;
use crate::vnode::VirtualNode;

/// Size of the ring: every `u32` is a position.
pub const RING_SIZE: u64 = 1 << 32;

/// Share of the ring held by one physical node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeShare {
    pub node_id: NodeId,
    /// Number of virtual nodes placed for this node.
    pub vnodes: usize,
    /// Total number of positions routed to this node.
    pub arc: u64,
}

impl NodeShare {
    fn empty(node_id: NodeId) -> Self {
        Self {
            node_id,
            vnodes: 0,
            arc: 0,
        }
    }

    /// Fraction of the ring, in `[0, 1]`.
    pub fn share(&self) -> f64 {
        self.arc as f64 / RING_SIZE as f64
    }
}

/// Per-node ownership of a ring snapshot.
#[derive(Debug, Clone, Default)]
pub struct Ownership {
    shares: BTreeMap<NodeId, NodeShare>,
}

impl Ownership {
    /// Computes ownership from vnodes in any order.
    ///
    /// # Performance
    /// - **Time**: O(v log v) for v vnodes
    pub fn from_vnodes(vnodes: &[VirtualNode]) -> Self {
        let mut vnodes = vnodes.to_vec();
        vnodes.sort();

        let mut shares: BTreeMap<NodeId, NodeShare> = BTreeMap::new();
        let (first, last) = match (vnodes.first(), vnodes.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Self { shares },
        };

        for (idx, vnode) in vnodes.iter().enumerate() {
            let arc = if idx == 0 {
                // Everything after the last vnode plus everything up to the first.
                RING_SIZE - u64::from(last.position - first.position)
            } else {
                u64::from(vnodes[idx - 1].distance_to(vnode))
            };
            let entry = shares
                .entry(vnode.node_id.clone())
                .or_insert_with(|| NodeShare::empty(vnode.node_id.clone()));
            entry.vnodes += 1;
            entry.arc += arc;
        }

        Self { shares }
    }

    /// Computes ownership of a live ring.
    pub fn of(ring: &impl Lookup) -> Self {
        Self::from_vnodes(&ring.vnodes())
    }

    pub fn get(&self, node: &str) -> Option<&NodeShare> {
        self.shares.get(node)
    }

    /// Shares in node-name order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeShare> {
        self.shares.values()
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vnode(position: u32, owner: &str) -> VirtualNode {
        VirtualNode::new(position, NodeId::from(owner))
    }

    #[test]
    fn test_empty() {
        assert!(Ownership::from_vnodes(&[]).is_empty());
    }

    #[test]
    fn test_single_vnode_owns_everything() {
        let ownership = Ownership::from_vnodes(&[vnode(1234, "a")]);
        let a = ownership.get("a").unwrap();
        assert_eq!(a.arc, RING_SIZE);
        assert_eq!(a.share(), 1.0);
    }

    #[test]
    fn test_arcs_sum_to_ring_size() {
        let vnodes = vec![
            vnode(100, "a"),
            vnode(1_000, "b"),
            vnode(50_000, "a"),
            vnode(u32::MAX, "c"),
        ];
        let ownership = Ownership::from_vnodes(&vnodes);

        let a = ownership.get("a").unwrap();
        assert_eq!(a.vnodes, 2);
        // (MAX, 100] wraps: 1 + 100 positions, then (1000, 50000].
        assert_eq!(a.arc, 101 + 49_000);
        assert_eq!(ownership.get("b").unwrap().arc, 900);

        let total: u64 = ownership.iter().map(|s| s.arc).sum();
        assert_eq!(total, RING_SIZE);
    }

    #[test]
    fn test_unsorted_input() {
        let ownership = Ownership::from_vnodes(&[vnode(100, "a"), vnode(5, "b")]);
        assert_eq!(ownership.get("a").unwrap().arc, 95);
        assert_eq!(ownership.get("b").unwrap().arc, RING_SIZE - 95);

        let total: u64 = ownership.iter().map(|s| s.arc).sum();
        assert_eq!(total, RING_SIZE);
    }

    #[test]
    fn test_colliding_vnodes() {
        let ownership = Ownership::from_vnodes(&[vnode(7, "a"), vnode(7, "b")]);
        assert_eq!(ownership.get("a").unwrap().arc, RING_SIZE);
        assert_eq!(ownership.get("b").unwrap().arc, 0);
        assert_eq!(ownership.get("b").unwrap().vnodes, 1);
    }
}
