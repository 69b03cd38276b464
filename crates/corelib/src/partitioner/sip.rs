//! SipHash partitioner implementation.

use crate::partitioner::traits::Partitioner;
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// SipHash-1-3 with the zero key, truncated to the low 32 bits.
#[derive(Clone, Copy, Debug, Default)]
pub struct SipPartitioner;

impl Partitioner for SipPartitioner {
    fn position(&self, key: &[u8]) -> u32 {
        let mut hasher = SipHasher13::new();
        hasher.write(key);
        hasher.finish() as u32
    }

    fn name(&self) -> &'static str {
        "SipPartitioner"
    }
}
