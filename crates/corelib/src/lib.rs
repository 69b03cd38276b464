//! Core library for consistent hashing.
//!
//! This crate provides:
//! - Partitioners mapping bytes to positions on a 32-bit ring
//! - A fixed-replica ring ([`HashRing`]) and a weighted ring with dynamic
//!   membership ([`WeightedRing`]) sharing one lookup algorithm
//! - Ownership and migration views for monitoring and testing
//! - JSON ring configuration

pub mod config;
pub mod error;
pub mod migration;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod topology;
pub mod vnode;

pub use config::{AnyRing, RingConfig, RingKind};
pub use error::{Error, Result};
pub use migration::MigrationReport;
pub use node::NodeId;
pub use partitioner::{Partitioner, PartitionerKind};
pub use ring::{HashRing, Lookup, RingBuilder, WeightedRing, WeightedRingBuilder};
pub use topology::{NodeShare, Ownership};
pub use vnode::VirtualNode;
