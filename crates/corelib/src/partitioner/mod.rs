//! Partitioner abstraction for consistent hashing.
//!
//! Partitioners are responsible for converting keys into positions
//! that can be placed on the hash ring. Both ring flavours accept any
//! [`Partitioner`]; the kind is fixed at construction.

pub mod crc32;
pub mod sha1_window;
pub mod sip;
pub mod traits;
pub mod xxh3;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use crc32::Crc32Partitioner;
pub use sha1_window::Sha1WindowPartitioner;
pub use sip::SipPartitioner;
pub use traits::{FnPartitioner, Partitioner};
pub use xxh3::Xxh3Partitioner;

/// Names the built-in partitioners so configs and the CLI can pick one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartitionerKind {
    Crc32,
    Sha1Window,
    Sip,
    Xxh3,
}

impl PartitionerKind {
    /// Instantiates the partitioner behind a box.
    pub fn build(self) -> Box<dyn Partitioner> {
        match self {
            PartitionerKind::Crc32 => Box::new(Crc32Partitioner),
            PartitionerKind::Sha1Window => Box::new(Sha1WindowPartitioner),
            PartitionerKind::Sip => Box::new(SipPartitioner),
            PartitionerKind::Xxh3 => Box::new(Xxh3Partitioner),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            PartitionerKind::Crc32 => "crc32",
            PartitionerKind::Sha1Window => "sha1-window",
            PartitionerKind::Sip => "sip",
            PartitionerKind::Xxh3 => "xxh3",
        }
    }
}

impl fmt::Display for PartitionerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartitionerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crc32" => Ok(PartitionerKind::Crc32),
            "sha1-window" | "sha1" => Ok(PartitionerKind::Sha1Window),
            "sip" => Ok(PartitionerKind::Sip),
            "xxh3" => Ok(PartitionerKind::Xxh3),
            other => {
                let msg = format!("unknown partitioner `{}`", other);
                Err(Error::InvalidConfig(msg))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in [
            PartitionerKind::Crc32,
            PartitionerKind::Sha1Window,
            PartitionerKind::Sip,
            PartitionerKind::Xxh3,
        ] {
            assert_eq!(kind.to_string().parse::<PartitionerKind>().unwrap(), kind);
        }
        assert!("md5".parse::<PartitionerKind>().is_err());
    }

    #[test]
    fn test_boxed_matches_concrete() {
        let boxed = PartitionerKind::Sha1Window.build();
        assert_eq!(boxed.name(), "Sha1WindowPartitioner");
        let direct = Sha1WindowPartitioner.position(b"key");
        assert_eq!(boxed.position(b"key"), direct);
    }

    #[test]
    fn test_builtins_are_deterministic() {
        for kind in [
            PartitionerKind::Crc32,
            PartitionerKind::Sha1Window,
            PartitionerKind::Sip,
            PartitionerKind::Xxh3,
        ] {
            let a = kind.build();
            let b = kind.build();
            assert_eq!(a.position(b"some-key"), b.position(b"some-key"), "{}", kind);
        }
    }
}
