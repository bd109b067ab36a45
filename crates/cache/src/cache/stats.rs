//! Cache statistics and metrics tracking
//!
//! Counters are plain atomics updated while the cache lock is already held,
//! so enabling them adds no extra locking.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for cache performance monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of entries
    pub size: usize,

    /// Maximum allowed entries
    pub capacity: usize,

    /// Lookups that found their key
    pub hits: u64,

    /// Lookups that did not find their key
    pub misses: u64,

    /// Puts that added a new key
    pub inserts: u64,

    /// Puts that replaced the value of an existing key
    pub updates: u64,

    /// Entries evicted to stay within capacity
    pub evictions: u64,

    /// Entries removed by `remove` or by a `for_each` predicate
    pub removals: u64,
}

impl CacheStats {
    /// Calculate hit rate (hits / total lookups)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Calculate miss rate (misses / total lookups)
    pub fn miss_rate(&self) -> f64 {
        1.0 - self.hit_rate()
    }

    /// Calculate fill percentage (size / capacity)
    pub fn fill_percentage(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.size as f64 / self.capacity as f64
        }
    }

    /// Total number of lookups (hits + misses)
    pub fn total_accesses(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Lock-free counters backing [`CacheStats`]
///
/// Recording is a no-op when the collector was created disabled.
#[derive(Debug, Default)]
pub(crate) struct MetricsCollector {
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    updates: AtomicU64,
    evictions: AtomicU64,
    removals: AtomicU64,
}

impl MetricsCollector {
    pub(crate) fn new(enabled: bool) -> Self {
        Self { enabled, ..Self::default() }
    }

    fn bump(&self, counter: &AtomicU64) {
        if self.enabled {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_hit(&self) {
        self.bump(&self.hits);
    }

    pub(crate) fn record_miss(&self) {
        self.bump(&self.misses);
    }

    pub(crate) fn record_insert(&self) {
        self.bump(&self.inserts);
    }

    pub(crate) fn record_update(&self) {
        self.bump(&self.updates);
    }

    pub(crate) fn record_eviction(&self) {
        self.bump(&self.evictions);
    }

    pub(crate) fn record_removal(&self) {
        self.bump(&self.removals);
    }

    /// Get current statistics snapshot
    pub(crate) fn snapshot(&self, size: usize, capacity: usize) -> CacheStats {
        CacheStats {
            size,
            capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
        }
    }
}
