//! Cache Options Module
//!
//! Options recognised when opening a `FileCache`.

use crate::cache::DEFAULT_CAPACITY;

// == Cache Options ==
/// Options for `FileCache::open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// Maximum total bytes retained across all entries
    pub capacities: u64,
}

impl CacheOptions {
    /// Creates options with the default 1 MiB capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum total bytes the cache should retain.
    pub fn with_capacities(mut self, capacities: u64) -> Self {
        self.capacities = capacities;
        self
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            capacities: DEFAULT_CAPACITY,
        }
    }
}
