//! Consistent hash ring implementation.
//!
//! Two flavours share one lookup algorithm (binary search for the first
//! virtual node at or after the key's position, wrapping to the start):
//!
//! - [`HashRing`]: fixed replica count per node, add-only membership
//! - [`WeightedRing`]: per-node weights, add/update/remove with full rebuild

mod builder;
mod continuum;
pub mod replica;
pub mod weighted;

pub use builder::{RingBuilder, WeightedRingBuilder};
pub use replica::{HashRing, DEFAULT_REPLICAS};
pub use weighted::{WeightedRing, DEFAULT_SPOT_BUDGET};

use crate::node::NodeId;
use crate::vnode::VirtualNode;

/// Read-side view shared by every ring flavour.
pub trait Lookup {
    /// Node owning `key`, `None` while the ring is empty.
    fn locate(&self, key: &[u8]) -> Option<NodeId>;

    /// Snapshot of the virtual nodes, sorted by position.
    fn vnodes(&self) -> Vec<VirtualNode>;
}
