//! Weighted hash ring with dynamic membership.
//!
//! The weight table is the source of truth. Every mutation rewrites the
//! table and then rebuilds the whole continuum from it, so the ring is always
//! a pure function of the current weights: removing a node and adding it
//! back with the same weight restores exactly the same positions.
//!
//! # Spot allocation
//!
//! With a per-node spot budget `b`, `n` weighted nodes and total weight `W`,
//! a node of weight `w` receives `floor(w * b * n / W)` spots. Rounding
//! remainders are dropped, so the ring may hold slightly fewer than `b * n`
//! spots. Spot `i` (1-based) of node `x` sits at `position("x:i")`.
//!
//! The share is computed in integers, not as `w / W * b * n` in floating
//! point. The two can disagree by one spot: weights `{a: 11, b: 4}` with a
//! budget of 150 give `a` exactly 220 spots, where the float product lands
//! just under 220 and truncates to 219.
//!
//! Nodes with weight 0 stay members but place no spots and do not count
//! towards `n`, so an idle node does not inflate the others' share: with
//! weights `{a: 1, idle: 0}` and a budget of 10, `a` gets 10 spots, not 20.
//! When every weight is 0 the ring is empty.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::node::NodeId;
use crate::partitioner::{Partitioner, Sha1WindowPartitioner};
use crate::ring::continuum::Continuum;
use crate::ring::Lookup;
use crate::vnode::VirtualNode;

/// Spot budget per node used when none (or 0) is configured.
pub const DEFAULT_SPOT_BUDGET: usize = 400;

#[derive(Default)]
struct State {
    weights: BTreeMap<NodeId, u32>,
    continuum: Continuum,
}

/// Consistent hash ring whose nodes claim ring share in proportion to
/// their weight.
///
/// # Concurrency
///
/// Table updates and rebuilds run under the write half of a
/// `parking_lot::RwLock`; lookups take the read half. A lookup either sees
/// the ring from before a mutation or the fully rebuilt one after it.
///
/// # Example
///
/// ```rust
/// use corelib::WeightedRing;
///
/// let ring = WeightedRing::new(100);
/// ring.add_nodes([("192.168.1.1", 2), ("192.168.1.2", 2), ("192.168.1.3", 3)]);
/// assert_eq!(ring.get_node("1").unwrap(), "192.168.1.3");
///
/// ring.remove_node("192.168.1.3");
/// assert_eq!(ring.get_node("1").unwrap(), "192.168.1.1");
/// ```
pub struct WeightedRing<P = Sha1WindowPartitioner> {
    partitioner: P,
    spot_budget: usize,
    state: RwLock<State>,
}

impl WeightedRing {
    /// Creates an empty ring using the SHA-1 window partitioner.
    ///
    /// A `spot_budget` of 0 selects [`DEFAULT_SPOT_BUDGET`].
    pub fn new(spot_budget: usize) -> Self {
        Self::with_partitioner(spot_budget, Sha1WindowPartitioner)
    }
}

impl Default for WeightedRing {
    fn default() -> Self {
        Self::new(DEFAULT_SPOT_BUDGET)
    }
}

impl<P: Partitioner> WeightedRing<P> {
    pub fn with_partitioner(spot_budget: usize, partitioner: P) -> Self {
        let spot_budget = if spot_budget == 0 {
            DEFAULT_SPOT_BUDGET
        } else {
            spot_budget
        };
        Self {
            partitioner,
            spot_budget,
            state: RwLock::new(State::default()),
        }
    }

    /// Inserts or overwrites the given weights, then rebuilds once.
    pub fn add_nodes<I, K>(&self, weights: I)
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<NodeId>,
    {
        let mut state = self.state.write();
        for (node, weight) in weights {
            state.weights.insert(node.into(), weight);
        }
        self.rebuild(&mut state);
    }

    /// Inserts or overwrites one node's weight, then rebuilds.
    pub fn add_node(&self, node: impl Into<NodeId>, weight: u32) {
        let mut state = self.state.write();
        state.weights.insert(node.into(), weight);
        self.rebuild(&mut state);
    }

    /// Same table effect as [`add_node`](Self::add_node).
    pub fn update_node(&self, node: impl Into<NodeId>, weight: u32) {
        self.add_node(node, weight);
    }

    /// Removes a node and rebuilds. Returns `false`, leaving the ring
    /// untouched, when the node was not a member.
    pub fn remove_node(&self, node: &str) -> bool {
        let mut state = self.state.write();
        if state.weights.remove(node).is_none() {
            return false;
        }
        self.rebuild(&mut state);
        true
    }

    /// Returns the node owning `key`, or `None` while the ring is empty.
    pub fn get_node(&self, key: impl AsRef<[u8]>) -> Option<NodeId> {
        let position = self.partitioner.position(key.as_ref());
        self.state
            .read()
            .continuum
            .locate(position)
            .map(|vnode| vnode.node_id.clone())
    }

    pub fn weight(&self, node: &str) -> Option<u32> {
        self.state.read().weights.get(node).copied()
    }

    /// Copy of the weight table.
    pub fn weights(&self) -> BTreeMap<NodeId, u32> {
        self.state.read().weights.clone()
    }

    /// Number of member nodes, including zero-weight ones.
    pub fn node_count(&self) -> usize {
        self.state.read().weights.len()
    }

    /// Copy of the virtual nodes, sorted by position.
    pub fn vnodes(&self) -> Vec<VirtualNode> {
        self.state.read().continuum.as_slice().to_vec()
    }

    pub fn vnode_count(&self) -> usize {
        self.state.read().continuum.len()
    }

    pub fn spot_budget(&self) -> usize {
        self.spot_budget
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().continuum.is_empty()
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }

    fn rebuild(&self, state: &mut State) {
        let continuum = build_continuum(&state.weights, self.spot_budget, &self.partitioner);
        debug!(
            nodes = state.weights.len(),
            spots = continuum.len(),
            "rebuilt weighted ring"
        );
        state.continuum = continuum;
    }
}

/// Number of spots a node of `weight` gets out of `total_spots`.
fn spots_for(weight: u32, total_weight: u64, total_spots: usize) -> usize {
    if total_weight == 0 {
        return 0;
    }
    (u128::from(weight) * total_spots as u128 / u128::from(total_weight)) as usize
}

fn build_continuum<P: Partitioner>(
    weights: &BTreeMap<NodeId, u32>,
    spot_budget: usize,
    partitioner: &P,
) -> Continuum {
    let total_weight: u64 = weights.values().map(|&w| u64::from(w)).sum();
    let weighted_nodes = weights.values().filter(|&&w| w > 0).count();
    let total_spots = spot_budget.saturating_mul(weighted_nodes);

    let mut vnodes = Vec::with_capacity(total_spots);
    for (node_id, &weight) in weights {
        let spots = spots_for(weight, total_weight, total_spots);
        for i in 1..=spots {
            let key = format!("{}:{}", node_id, i);
            let position = partitioner.position(key.as_bytes());
            vnodes.push(VirtualNode::new(position, node_id.clone()));
        }
    }
    Continuum::from_unsorted(vnodes)
}

impl<P: Partitioner> Lookup for WeightedRing<P> {
    fn locate(&self, key: &[u8]) -> Option<NodeId> {
        self.get_node(key)
    }

    fn vnodes(&self) -> Vec<VirtualNode> {
        self.state.read().continuum.as_slice().to_vec()
    }
}

impl<P: Partitioner> std::fmt::Debug for WeightedRing<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("WeightedRing")
            .field("partitioner", &self.partitioner.name())
            .field("spot_budget", &self.spot_budget)
            .field("weights", &state.weights)
            .field("vnodes", &state.continuum.len())
            .finish()
    }
}
