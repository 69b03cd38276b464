//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Instead of placing each physical node at a single point on the ring, every
//! node is placed at many points ("spots"). This provides:
//!
//! 1. **Better Load Distribution**: More spots = smoother distribution of keys
//! 2. **Gradual Rebalancing**: When nodes join/leave, only a fraction of keys move
//! 3. **Capacity Weighting**: A node with more spots claims a larger share of the ring
//!
//! # Performance Characteristics
//!
//! - **Memory**: O(v) where v = total spots on the ring
//! - **Lookup**: O(log v) binary search over the sorted spots
//! - **Rebalancing**: roughly k/(n+1) keys move when the (n+1)th node joins

use crate::node::NodeId;
use std::cmp::Ordering;

/// A virtual node on the hash ring.
///
/// Represents a single position owned by a physical node. Each physical node
/// usually owns many of them.
///
/// # Invariants
///
/// - Every `VirtualNode` belongs to exactly one physical node
/// - Ordering and equality look at `position` only; two vnodes that collide
///   on the same position compare equal even if their owners differ
#[derive(Debug, Clone)]
pub struct VirtualNode {
    /// Position on the 32-bit ring.
    pub position: u32,

    /// The physical node that owns this virtual node.
    pub node_id: NodeId,
}

impl VirtualNode {
    /// Create a new virtual node.
    #[inline]
    pub fn new(position: u32, node_id: NodeId) -> Self {
        Self { position, node_id }
    }

    #[inline]
    pub fn position(&self) -> u32 {
        self.position
    }

    #[inline]
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Clockwise distance from this virtual node to `other`.
    ///
    /// The ring wraps at `u32::MAX`, so the distance from a position near the
    /// top of the ring to one near zero is small.
    ///
    /// # Example
    /// ```rust
    /// use corelib::{NodeId, VirtualNode};
    ///
    /// let a = VirtualNode::new(u32::MAX - 9, NodeId::from("a"));
    /// let b = VirtualNode::new(10, NodeId::from("b"));
    /// assert_eq!(a.distance_to(&b), 20);
    /// ```
    #[inline]
    pub fn distance_to(&self, other: &Self) -> u32 {
        other.position.wrapping_sub(self.position)
    }
}

impl PartialEq for VirtualNode {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl Eq for VirtualNode {}

impl PartialOrd for VirtualNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VirtualNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position.cmp(&other.position)
    }
}

impl std::fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let VirtualNode { position, node_id } = self;
        write!(f, "VNode(position={:08x}, node={})", position, node_id)
    }
}
