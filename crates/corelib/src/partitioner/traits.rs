//! Core partitioner trait definitions.

/// A partitioner converts bytes into a position on the 32-bit hash ring.
///
/// The same partitioner places both virtual nodes and lookup keys, so it
/// must be deterministic: equal input always yields an equal position, in
/// this process and in every other one using the same strategy.
///
/// Partitioners are stateless and thread-safe, allowing concurrent
/// position computation without synchronization overhead.
pub trait Partitioner: Send + Sync + 'static {
    /// Converts a key into a ring position.
    fn position(&self, key: &[u8]) -> u32;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}

impl<P: Partitioner + ?Sized> Partitioner for Box<P> {
    fn position(&self, key: &[u8]) -> u32 {
        (**self).position(key)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Adapts a plain hash function into a [`Partitioner`].
///
/// # Example
///
/// ```rust
/// use corelib::partitioner::{FnPartitioner, Partitioner};
///
/// let p = FnPartitioner::new(|key: &[u8]| key.len() as u32);
/// assert_eq!(p.position(b"abc"), 3);
/// ```
#[derive(Clone)]
pub struct FnPartitioner<F> {
    hash: F,
}

impl<F> FnPartitioner<F>
where
    F: Fn(&[u8]) -> u32 + Send + Sync + 'static,
{
    pub fn new(hash: F) -> Self {
        Self { hash }
    }
}

impl<F> Partitioner for FnPartitioner<F>
where
    F: Fn(&[u8]) -> u32 + Send + Sync + 'static,
{
    fn position(&self, key: &[u8]) -> u32 {
        (self.hash)(key)
    }

    fn name(&self) -> &'static str {
        "FnPartitioner"
    }
}

impl<F> std::fmt::Debug for FnPartitioner<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnPartitioner")
    }
}
