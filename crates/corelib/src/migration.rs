//! Migration ratio between two ring states.
//!
//! Counts how many keys of a sample resolve to a different owner after a
//! membership change. A healthy consistent hash moves about `1/(n+1)` of the
//! keys when growing from `n` to `n+1` nodes; modulo hashing would move
//! nearly all of them.

use std::fmt;

use crate::ring::Lookup;

/// Outcome of comparing two rings over a key sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MigrationReport {
    /// Keys looked up in both rings.
    pub sampled: usize,
    /// Keys whose owner differs between the rings.
    pub moved: usize,
}

impl MigrationReport {
    pub fn measure<K, I>(old: &impl Lookup, new: &impl Lookup, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        let mut report = Self::default();
        for key in keys {
            let key = key.as_ref();
            report.sampled += 1;
            if old.locate(key) != new.locate(key) {
                report.moved += 1;
            }
        }
        report
    }

    /// Fraction of sampled keys that moved; 0 for an empty sample.
    pub fn ratio(&self) -> f64 {
        if self.sampled == 0 {
            return 0.0;
        }
        self.moved as f64 / self.sampled as f64
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} keys moved ({:.4}%)",
            self.moved,
            self.sampled,
            self.ratio() * 100.0
        )
    }
}
