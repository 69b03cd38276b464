//! Ring configuration loaded from JSON.
//!
//! ```json
//! {
//!   "kind": "weighted",
//!   "spot_budget": 100,
//!   "partitioner": "sha1-window",
//!   "nodes": { "192.168.1.1": 2, "192.168.1.2": 2, "192.168.1.3": 3 }
//! }
//! ```
//!
//! Replica rings are unweighted, so every node weight there must be 1.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::partitioner::{Partitioner, PartitionerKind};
use crate::ring::{HashRing, Lookup, WeightedRing, DEFAULT_REPLICAS, DEFAULT_SPOT_BUDGET};
use crate::vnode::VirtualNode;

/// Which ring flavour a config describes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RingKind {
    Replica,
    #[default]
    Weighted,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RingConfig {
    #[serde(default)]
    pub kind: RingKind,
    /// Virtual nodes per node for replica rings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<usize>,
    /// Spot budget per node for weighted rings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spot_budget: Option<usize>,
    /// Defaults to crc32 for replica rings and sha1-window for weighted ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partitioner: Option<PartitionerKind>,
    #[serde(default)]
    pub nodes: BTreeMap<String, u32>,
}

impl RingConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.nodes.keys().any(|name| name.is_empty()) {
            return Err(Error::InvalidNode("node name must not be empty".into()));
        }
        match self.kind {
            RingKind::Replica => {
                if self.replicas == Some(0) {
                    return Err(Error::InvalidConfig(
                        "replica count must be at least 1".into(),
                    ));
                }
                if self.spot_budget.is_some() {
                    return Err(Error::InvalidConfig(
                        "spot_budget only applies to weighted rings".into(),
                    ));
                }
                if let Some((name, weight)) = self.nodes.iter().find(|&(_, &w)| w != 1) {
                    return Err(Error::InvalidConfig(format!(
                        "replica rings are unweighted, `{}` has weight {}",
                        name, weight
                    )));
                }
            }
            RingKind::Weighted => {
                if self.replicas.is_some() {
                    return Err(Error::InvalidConfig(
                        "replicas only applies to replica rings".into(),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn partitioner_kind(&self) -> PartitionerKind {
        self.partitioner.unwrap_or(match self.kind {
            RingKind::Replica => PartitionerKind::Crc32,
            RingKind::Weighted => PartitionerKind::Sha1Window,
        })
    }

    /// Validates the config and builds the ring it describes.
    pub fn build(&self) -> Result<AnyRing> {
        self.validate()?;
        let partitioner = self.partitioner_kind().build();
        let ring = match self.kind {
            RingKind::Replica => {
                let ring = HashRing::with_partitioner(
                    self.replicas.unwrap_or(DEFAULT_REPLICAS),
                    partitioner,
                );
                ring.add(self.nodes.keys());
                AnyRing::Replica(ring)
            }
            RingKind::Weighted => {
                let ring = WeightedRing::with_partitioner(
                    self.spot_budget.unwrap_or(DEFAULT_SPOT_BUDGET),
                    partitioner,
                );
                if !self.nodes.is_empty() {
                    ring.add_nodes(self.nodes.iter().map(|(name, &w)| (name, w)));
                }
                AnyRing::Weighted(ring)
            }
        };
        Ok(ring)
    }
}

/// A ring of either flavour with a partitioner chosen at runtime.
#[derive(Debug)]
pub enum AnyRing {
    Replica(HashRing<Box<dyn Partitioner>>),
    Weighted(WeightedRing<Box<dyn Partitioner>>),
}

impl AnyRing {
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<NodeId> {
        self.locate(key.as_ref())
    }

    pub fn vnode_count(&self) -> usize {
        match self {
            AnyRing::Replica(ring) => ring.vnode_count(),
            AnyRing::Weighted(ring) => ring.vnode_count(),
        }
    }

    pub fn partitioner_name(&self) -> &'static str {
        match self {
            AnyRing::Replica(ring) => ring.partitioner_name(),
            AnyRing::Weighted(ring) => ring.partitioner_name(),
        }
    }
}

impl Lookup for AnyRing {
    fn locate(&self, key: &[u8]) -> Option<NodeId> {
        match self {
            AnyRing::Replica(ring) => ring.get(key),
            AnyRing::Weighted(ring) => ring.get_node(key),
        }
    }

    fn vnodes(&self) -> Vec<VirtualNode> {
        match self {
            AnyRing::Replica(ring) => ring.vnodes(),
            AnyRing::Weighted(ring) => ring.vnodes(),
        }
    }
}
