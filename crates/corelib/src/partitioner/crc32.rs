//! CRC-32 partitioner implementation.

use crate::partitioner::traits::Partitioner;

/// CRC-32 (IEEE polynomial) partitioner.
///
/// Default strategy of the fixed-replica ring.
#[derive(Clone, Copy, Debug, Default)]
pub struct Crc32Partitioner;

impl Partitioner for Crc32Partitioner {
    fn position(&self, key: &[u8]) -> u32 {
        crc32fast::hash(key)
    }

    fn name(&self) -> &'static str {
        "Crc32Partitioner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ieee_check_value() {
        // Standard CRC-32/IEEE check value.
        assert_eq!(Crc32Partitioner.position(b"123456789"), 0xcbf4_3926);
        assert_eq!(Crc32Partitioner.position(b""), 0);
    }
}
