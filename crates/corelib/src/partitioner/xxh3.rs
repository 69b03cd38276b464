//! XXH3 partitioner implementation.

use crate::partitioner::traits::Partitioner;
use xxhash_rust::xxh3::xxh3_64;

/// XXH3-64 truncated to the low 32 bits.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3Partitioner;

impl Partitioner for Xxh3Partitioner {
    fn position(&self, key: &[u8]) -> u32 {
        xxh3_64(key) as u32
    }

    fn name(&self) -> &'static str {
        "Xxh3Partitioner"
    }
}
