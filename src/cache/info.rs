//! Cache Info Module
//!
//! Snapshot of disk usage returned by `FileCache::info`.

use serde::Serialize;

// == Cache Info ==
/// Disk usage of a cache at the moment it was measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheInfo {
    /// Sum of all backing file sizes in bytes
    pub size: u64,
    /// Configured maximum total bytes
    pub capacities: u64,
}

impl CacheInfo {
    // == Constructor ==
    pub fn new(size: u64, capacities: u64) -> Self {
        Self { size, capacities }
    }

    // == Usage Ratio ==
    /// Returns size / capacities, or 0.0 for a zero capacity.
    pub fn usage_ratio(&self) -> f64 {
        if self.capacities == 0 {
            0.0
        } else {
            self.size as f64 / self.capacities as f64
        }
    }

    // == Over Capacity ==
    /// True when the cache holds more than its capacity. This only persists
    /// after a purge when a single entry alone exceeds the capacity.
    pub fn is_over_capacity(&self) -> bool {
        self.size > self.capacities
    }
}
