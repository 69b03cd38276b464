//! Fixed-replica hash ring.
//!
//! Every node is placed `replicas` times. Virtual node `i` of node `n` sits
//! at `hash(i ++ n)`, e.g. `"0cache-a"`, `"1cache-a"`, ... Nodes can only be
//! added; the ring never shrinks once populated.

use std::collections::BTreeSet;

use parking_lot::RwLock;
use tracing::trace;

use crate::node::NodeId;
use crate::partitioner::{Crc32Partitioner, FnPartitioner, Partitioner};
use crate::ring::continuum::Continuum;
use crate::ring::Lookup;
use crate::vnode::VirtualNode;

/// Replica count used when none is configured.
pub const DEFAULT_REPLICAS: usize = 3;

/// Consistent hash ring with a fixed number of virtual nodes per node.
///
/// # Concurrency
///
/// The continuum sits behind a `parking_lot::RwLock`. `add` builds the grown
/// continuum while holding the write lock and swaps it in whole, so `get`
/// never sees an unsorted ring.
///
/// # Example
///
/// ```rust
/// use corelib::HashRing;
///
/// let ring = HashRing::new(3);
/// ring.add(["cache-a", "cache-b", "cache-c"]);
///
/// let owner = ring.get("user:42").unwrap();
/// assert_eq!(ring.get("user:42"), Some(owner));
/// ```
pub struct HashRing<P = Crc32Partitioner> {
    partitioner: P,
    replicas: usize,
    continuum: RwLock<Continuum>,
}

impl HashRing {
    /// Creates an empty ring hashing with CRC-32.
    pub fn new(replicas: usize) -> Self {
        Self::with_partitioner(replicas, Crc32Partitioner)
    }
}

impl<F> HashRing<FnPartitioner<F>>
where
    F: Fn(&[u8]) -> u32 + Send + Sync + 'static,
{
    /// Creates an empty ring hashing with a caller-supplied function.
    pub fn with_hash_fn(replicas: usize, hash: F) -> Self {
        Self::with_partitioner(replicas, FnPartitioner::new(hash))
    }
}

impl<P: Partitioner> HashRing<P> {
    pub fn with_partitioner(replicas: usize, partitioner: P) -> Self {
        Self {
            partitioner,
            replicas,
            continuum: RwLock::new(Continuum::default()),
        }
    }

    /// Adds nodes to the ring.
    ///
    /// Existing virtual nodes are kept; the new ones are appended and the
    /// whole ring is re-sorted. Adding the same node twice places it twice.
    pub fn add<I>(&self, nodes: I)
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        let mut placed = Vec::new();
        for node in nodes {
            let node_id = node.into();
            for i in 0..self.replicas {
                let key = format!("{}{}", i, node_id);
                let position = self.partitioner.position(key.as_bytes());
                placed.push(VirtualNode::new(position, node_id.clone()));
            }
            trace!(node = %node_id, replicas = self.replicas, "placed node");
        }
        if placed.is_empty() {
            return;
        }

        let mut continuum = self.continuum.write();
        *continuum = continuum.extended(placed);
    }

    /// Adds a single node to the ring.
    pub fn add_node(&self, node: impl Into<NodeId>) {
        self.add(std::iter::once(node));
    }

    /// Returns the node owning `key`, or `None` while the ring is empty.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<NodeId> {
        let position = self.partitioner.position(key.as_ref());
        self.continuum
            .read()
            .locate(position)
            .map(|vnode| vnode.node_id.clone())
    }

    /// Copy of the virtual nodes, sorted by position.
    pub fn vnodes(&self) -> Vec<VirtualNode> {
        self.continuum.read().as_slice().to_vec()
    }

    pub fn vnode_count(&self) -> usize {
        self.continuum.read().len()
    }

    /// Distinct physical nodes, in name order.
    pub fn nodes(&self) -> Vec<NodeId> {
        let continuum = self.continuum.read();
        let names: BTreeSet<&NodeId> = continuum.as_slice().iter().map(|v| &v.node_id).collect();
        names.into_iter().cloned().collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes().len()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    pub fn is_empty(&self) -> bool {
        self.continuum.read().is_empty()
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }
}

impl<P: Partitioner> Lookup for HashRing<P> {
    fn locate(&self, key: &[u8]) -> Option<NodeId> {
        self.get(key)
    }

    fn vnodes(&self) -> Vec<VirtualNode> {
        self.continuum.read().as_slice().to_vec()
    }
}

impl<P: Partitioner> std::fmt::Debug for HashRing<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashRing")
            .field("partitioner", &self.partitioner.name())
            .field("replicas", &self.replicas)
            .field("vnodes", &self.vnode_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hashes decimal strings to their numeric value so positions are easy
    /// to reason about: node "4" sits at 4, 14 and 24.
    fn decimal_ring() -> HashRing<FnPartitioner<impl Fn(&[u8]) -> u32 + Send + Sync + 'static>> {
        HashRing::with_hash_fn(3, |data: &[u8]| {
            std::str::from_utf8(data)
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(0)
        })
    }

    #[test]
    fn test_placement_uses_index_then_name() {
        let ring = decimal_ring();
        ring.add(["4"]);

        let positions: Vec<u32> = ring.vnodes().iter().map(|v| v.position).collect();
        assert_eq!(positions, vec![4, 14, 24]);
    }

    #[test]
    fn test_lookup_and_incremental_add() {
        let ring = decimal_ring();
        ring.add(["4", "6", "2"]);

        assert_eq!(ring.get("15").unwrap(), "6");
        assert_eq!(ring.get("11").unwrap(), "2");
        assert_eq!(ring.get("23").unwrap(), "4");
        assert_eq!(ring.get("27").unwrap(), "2"); // wraps to position 2

        // Node "8" lands on 8, 18 and 28; only 27 moves.
        ring.add_node("8");

        assert_eq!(ring.get("15").unwrap(), "6");
        assert_eq!(ring.get("11").unwrap(), "2");
        assert_eq!(ring.get("23").unwrap(), "4");
        assert_eq!(ring.get("27").unwrap(), "8");
    }

    #[test]
    fn test_empty_ring() {
        let ring = HashRing::new(3);
        assert!(ring.is_empty());
        assert_eq!(ring.get("anything"), None);

        ring.add(Vec::<NodeId>::new());
        assert!(ring.is_empty());
    }

    #[test]
    fn test_duplicate_add_doubles_vnodes() {
        let ring = HashRing::new(3);
        ring.add(["a"]);
        ring.add(["a"]);

        assert_eq!(ring.vnode_count(), 6);
        assert_eq!(ring.node_count(), 1);
    }

    #[test]
    fn test_zero_replicas_never_populates() {
        let ring = HashRing::new(0);
        ring.add(["a", "b"]);
        assert!(ring.is_empty());
        assert_eq!(ring.get("k"), None);
    }

    #[test]
    fn test_debug_output() {
        let ring = HashRing::new(2);
        ring.add_node("a");
        assert_eq!(
            format!("{:?}", ring),
            "HashRing { partitioner: \"Crc32Partitioner\", replicas: 2, vnodes: 2 }"
        );
    }
}
