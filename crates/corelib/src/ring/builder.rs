//! Fluent builders for both ring flavours.

use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::partitioner::{Crc32Partitioner, Partitioner, Sha1WindowPartitioner};
use crate::ring::replica::{HashRing, DEFAULT_REPLICAS};
use crate::ring::weighted::{WeightedRing, DEFAULT_SPOT_BUDGET};

fn check_name(node: &NodeId) -> Result<()> {
    if node.as_str().is_empty() {
        return Err(Error::InvalidNode("node name must not be empty".into()));
    }
    Ok(())
}

/// Builder for a fixed-replica [`HashRing`].
///
/// # Example
///
/// ```rust
/// use corelib::RingBuilder;
///
/// let ring = RingBuilder::new()
///     .with_replicas(8)
///     .add_node("a")
///     .add_node("b")
///     .build()
///     .unwrap();
/// assert_eq!(ring.vnode_count(), 16);
/// ```
#[derive(Debug)]
pub struct RingBuilder<P = Crc32Partitioner> {
    replicas: usize,
    partitioner: P,
    nodes: Vec<NodeId>,
}

impl RingBuilder {
    pub fn new() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            partitioner: Crc32Partitioner,
            nodes: Vec::new(),
        }
    }
}

impl Default for RingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Partitioner> RingBuilder<P> {
    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    /// Swaps the hash strategy.
    pub fn with_partitioner<Q: Partitioner>(self, partitioner: Q) -> RingBuilder<Q> {
        RingBuilder {
            replicas: self.replicas,
            partitioner,
            nodes: self.nodes,
        }
    }

    pub fn add_node(mut self, node: impl Into<NodeId>) -> Self {
        self.nodes.push(node.into());
        self
    }

    pub fn add_nodes<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        self.nodes.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Builds the ring. Fails on zero replicas or an empty node name.
    pub fn build(self) -> Result<HashRing<P>> {
        if self.replicas == 0 {
            return Err(Error::InvalidConfig(
                "replica count must be at least 1".into(),
            ));
        }
        for node in &self.nodes {
            check_name(node)?;
        }
        let ring = HashRing::with_partitioner(self.replicas, self.partitioner);
        ring.add(self.nodes);
        Ok(ring)
    }
}

/// Builder for a [`WeightedRing`].
#[derive(Debug)]
pub struct WeightedRingBuilder<P = Sha1WindowPartitioner> {
    spot_budget: usize,
    partitioner: P,
    weights: Vec<(NodeId, u32)>,
}

impl WeightedRingBuilder {
    pub fn new() -> Self {
        Self {
            spot_budget: DEFAULT_SPOT_BUDGET,
            partitioner: Sha1WindowPartitioner,
            weights: Vec::new(),
        }
    }
}

impl Default for WeightedRingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Partitioner> WeightedRingBuilder<P> {
    /// Per-node spot budget; 0 falls back to [`DEFAULT_SPOT_BUDGET`].
    pub fn with_spot_budget(mut self, spot_budget: usize) -> Self {
        self.spot_budget = spot_budget;
        self
    }

    pub fn with_partitioner<Q: Partitioner>(self, partitioner: Q) -> WeightedRingBuilder<Q> {
        WeightedRingBuilder {
            spot_budget: self.spot_budget,
            partitioner,
            weights: self.weights,
        }
    }

    pub fn add_node(mut self, node: impl Into<NodeId>, weight: u32) -> Self {
        self.weights.push((node.into(), weight));
        self
    }

    /// Builds the ring with a single rebuild. Later duplicates of a node
    /// overwrite earlier ones.
    pub fn build(self) -> Result<WeightedRing<P>> {
        for (node, _) in &self.weights {
            check_name(node)?;
        }
        let ring = WeightedRing::with_partitioner(self.spot_budget, self.partitioner);
        if !self.weights.is_empty() {
            ring.add_nodes(self.weights);
        }
        Ok(ring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partitioner::Xxh3Partitioner;

    #[test]
    fn test_ring_builder_default() {
        let ring = RingBuilder::new()
            .add_node("a")
            .add_node("b")
            .build()
            .unwrap();

        assert_eq!(ring.replicas(), DEFAULT_REPLICAS);
        assert_eq!(ring.node_count(), 2);
        assert_eq!(ring.vnode_count(), 2 * DEFAULT_REPLICAS);
    }

    #[test]
    fn test_ring_builder_rejects_zero_replicas() {
        let err = RingBuilder::new()
            .with_replicas(0)
            .add_node("a")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_ring_builder_rejects_empty_name() {
        let err = RingBuilder::new().add_nodes(["a", ""]).build().unwrap_err();
        assert!(matches!(err, Error::InvalidNode(_)));
    }

    #[test]
    fn test_ring_builder_custom_partitioner() {
        let ring = RingBuilder::new()
            .with_partitioner(Xxh3Partitioner)
            .add_node("a")
            .build()
            .unwrap();
        assert_eq!(ring.partitioner_name(), "Xxh3Partitioner");
    }

    #[test]
    fn test_weighted_builder_last_duplicate_wins() {
        let ring = WeightedRingBuilder::new()
            .with_spot_budget(10)
            .add_node("a", 1)
            .add_node("b", 1)
            .add_node("a", 3)
            .build()
            .unwrap();

        assert_eq!(ring.weight("a"), Some(3));
        assert_eq!(ring.vnode_count(), 20);
    }

    #[test]
    fn test_weighted_builder_empty() {
        let ring = WeightedRingBuilder::new().build().unwrap();
        assert!(ring.is_empty());
        assert_eq!(ring.spot_budget(), DEFAULT_SPOT_BUDGET);
    }
}
