//! SHA-1 digest window partitioner.
//!
//! The 20-byte digest is cut down to the interior window `[6, 10)` and the
//! four bytes are read little-endian. Skipping the leading bytes keeps
//! consecutive spot indices (`node:1`, `node:2`, ...) from landing in
//! visibly correlated positions.

use crate::partitioner::traits::Partitioner;
use sha1::{Digest, Sha1};

const WINDOW_START: usize = 6;

/// Partitioner used by the weighted ring.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha1WindowPartitioner;

impl Partitioner for Sha1WindowPartitioner {
    fn position(&self, key: &[u8]) -> u32 {
        let digest = Sha1::digest(key);
        window_value(&digest[WINDOW_START..WINDOW_START + 4])
    }

    fn name(&self) -> &'static str {
        "Sha1WindowPartitioner"
    }
}

/// Reassembles four bytes little-endian; shorter input maps to 0.
fn window_value(bytes: &[u8]) -> u32 {
    match bytes.get(..4) {
        Some(&[b0, b1, b2, b3]) => u32::from_le_bytes([b0, b1, b2, b3]),
        _ => 0,
    }
}
