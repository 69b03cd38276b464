//! Error types for the core library.
//!
//! Ring lookups and membership changes never fail: an empty ring answers
//! `None` and removing an unknown node does nothing. Errors only surface
//! while turning caller input (builders, config files) into a ring.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Error)]
pub enum Error {
    /// Ring configuration is unusable (zero replicas, missing nodes, ...).
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Node identifier is unusable.
    #[error("Invalid node: {0}")]
    InvalidNode(String),

    /// Config file could not be parsed.
    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}
