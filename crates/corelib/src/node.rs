//! Node abstractions for the consistent hash ring.
//!
//! Nodes are identified by name only. The ring never interprets the name
//! beyond hashing its bytes, so hostnames, `ip:port` pairs and opaque ids
//! all work.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a physical node.
///
/// Every virtual node carries its owner's id, so the name is kept behind an
/// `Arc<str>` and clones are a refcount bump.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(Arc<str>);

impl NodeId {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({:?})", &*self.0)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for NodeId {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&String> for NodeId {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(NodeId::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_lookup_by_str() {
        let mut weights = HashMap::new();
        weights.insert(NodeId::from("10.0.0.1"), 3u32);

        assert_eq!(weights.get("10.0.0.1"), Some(&3));
        assert_eq!(weights.get("10.0.0.2"), None);
    }

    #[test]
    fn test_display_is_raw_name() {
        let id = NodeId::from("cache-a");
        assert_eq!(id.to_string(), "cache-a");
        assert_eq!(format!("{:?}", id), "NodeId(\"cache-a\")");
        assert_eq!(id, "cache-a");
    }

    #[test]
    fn test_serde_as_plain_string() {
        let id = NodeId::from("n1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"n1\"");
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
