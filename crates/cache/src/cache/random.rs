//! Random-replacement cache
//!
//! When a new key arrives at a full cache, one live entry chosen uniformly at
//! random is evicted. Keys are kept in a dense vector alongside the map so the
//! victim can be picked and removed in `O(1)`: removal swaps the last key into
//! the vacated slot and fixes up that key's stored index.
//!
//! Reads never reorder anything, so `get` only takes the shared side of the
//! lock and concurrent readers do not block each other.

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::config::CacheConfig;
use super::stats::{CacheStats, MetricsCollector};
use super::traits::Cache;
use crate::error::CacheResult;

#[derive(Debug)]
struct Slot<V> {
    value: V,
    /// Position of this entry's key in `RandomStorage::keys`
    index: usize,
}

#[derive(Debug)]
struct RandomStorage<V> {
    entries: HashMap<String, Slot<V>>,
    keys: Vec<String>,
    rng: StdRng,
}

impl<V> RandomStorage<V> {
    fn new(capacity: usize, rng: StdRng) -> Self {
        Self { entries: HashMap::with_capacity(capacity), keys: Vec::with_capacity(capacity), rng }
    }

    /// Remove the key at `index` from the dense array, keeping the map in sync
    fn swap_delete(&mut self, index: usize) -> Option<(String, V)> {
        if index >= self.keys.len() {
            return None;
        }
        let key = self.keys.swap_remove(index);
        if let Some(moved) = self.keys.get(index) {
            if let Some(slot) = self.entries.get_mut(moved) {
                slot.index = index;
            }
        }
        let slot = self.entries.remove(&key)?;
        Some((key, slot.value))
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.entries.get(key)?.index;
        self.swap_delete(index).map(|(_, value)| value)
    }

    fn evict_random(&mut self) -> Option<(String, V)> {
        if self.keys.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..self.keys.len());
        self.swap_delete(index)
    }

    fn insert(&mut self, key: String, value: V) {
        let index = self.keys.len();
        self.keys.push(key.clone());
        self.entries.insert(key, Slot { value, index });
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.keys.clear();
    }
}

/// Thread-safe cache that evicts a random entry when full
///
/// # Example
/// ```
/// use sweepcache::cache::{Cache, CacheConfig, RandomReplacementCache};
///
/// let cache = RandomReplacementCache::new(CacheConfig::random("geoip", 2))?;
/// cache.put("a".to_string(), 1);
/// cache.put("b".to_string(), 2);
/// cache.put("c".to_string(), 3);
/// assert_eq!(cache.len(), 2);
/// assert_eq!(cache.get("c"), Some(3));
/// # Ok::<(), sweepcache::error::CacheError>(())
/// ```
pub struct RandomReplacementCache<V> {
    name: String,
    capacity: usize,
    storage: RwLock<RandomStorage<V>>,
    metrics: MetricsCollector,
}

impl<V> RandomReplacementCache<V> {
    /// Create a cache whose victims are drawn from an entropy-seeded RNG
    ///
    /// `config.eviction_policy` is not consulted.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`](crate::error::CacheError) when
    /// the capacity is zero.
    pub fn new(config: CacheConfig) -> CacheResult<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a cache with a fixed RNG seed, making eviction reproducible
    pub fn with_seed(config: CacheConfig, seed: u64) -> CacheResult<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: CacheConfig, rng: StdRng) -> CacheResult<Self> {
        config.validate()?;
        Ok(Self {
            storage: RwLock::new(RandomStorage::new(config.capacity, rng)),
            capacity: config.capacity,
            metrics: MetricsCollector::new(config.track_metrics),
            name: config.name,
        })
    }
}

impl<V> Cache<V> for RandomReplacementCache<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<V> {
        let storage = self.storage.read();
        match storage.entries.get(key) {
            Some(slot) => {
                self.metrics.record_hit();
                Some(slot.value.clone())
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    fn put(&self, key: String, value: V) {
        let mut storage = self.storage.write();

        if let Some(slot) = storage.entries.get_mut(&key) {
            slot.value = value;
            self.metrics.record_update();
            debug!(cache = %self.name, key = %key, "Updated cache element");
            return;
        }

        if storage.keys.len() >= self.capacity {
            if let Some((evicted, _)) = storage.evict_random() {
                self.metrics.record_eviction();
                debug!(cache = %self.name, key = %evicted, "Evicted random element");
            }
        }

        debug!(cache = %self.name, key = %key, "Added cache element");
        storage.insert(key, value);
        self.metrics.record_insert();
    }

    fn remove(&self, key: &str) -> Option<V> {
        let value = self.storage.write().remove(key)?;
        self.metrics.record_removal();
        debug!(cache = %self.name, key = %key, "Removed cache element");
        Some(value)
    }

    fn clear(&self) {
        self.storage.write().clear();
        debug!(cache = %self.name, "Cleared cache");
    }

    fn for_each(&self, predicate: &mut dyn FnMut(&str, &mut V) -> bool) {
        let mut storage = self.storage.write();
        let storage = &mut *storage;

        // Collect first; the key array is reshuffled by every removal.
        let mut doomed = Vec::new();
        for (key, slot) in &mut storage.entries {
            if predicate(key.as_str(), &mut slot.value) {
                doomed.push(key.clone());
            }
        }

        for key in &doomed {
            if storage.remove(key).is_some() {
                self.metrics.record_removal();
            }
        }

        if !doomed.is_empty() {
            debug!(cache = %self.name, removed = doomed.len(), "Removed elements during sweep");
        }
    }

    fn contains_key(&self, key: &str) -> bool {
        self.storage.read().entries.contains_key(key)
    }

    fn snapshot(&self) -> Vec<(String, V)> {
        let storage = self.storage.read();
        storage
            .keys
            .iter()
            .filter_map(|key| storage.entries.get(key).map(|slot| (key.clone(), slot.value.clone())))
            .collect()
    }

    fn len(&self) -> usize {
        self.storage.read().keys.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> CacheStats {
        self.metrics.snapshot(self.storage.read().keys.len(), self.capacity)
    }
}

impl<V> fmt::Debug for RandomReplacementCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomReplacementCache")
            .field("name", &self.name)
            .field("len", &self.storage.read().keys.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::random.
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::error::CacheError;

    fn filled(capacity: usize) -> RandomReplacementCache<i32> {
        let cache = RandomReplacementCache::new(CacheConfig::random("RRUnitTest", capacity)).unwrap();
        for i in 0..capacity {
            cache.put(i.to_string(), i as i32);
        }
        cache
    }

    /// Asserts the dense key array and the map describe the same entries.
    fn assert_consistent<V>(cache: &RandomReplacementCache<V>) {
        let storage = cache.storage.read();
        assert_eq!(storage.keys.len(), storage.entries.len());
        for (index, key) in storage.keys.iter().enumerate() {
            assert_eq!(storage.entries[key].index, index);
        }
        assert!(storage.keys.len() <= cache.capacity);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = RandomReplacementCache::<i32>::new(CacheConfig::random("zero", 0)).unwrap_err();
        assert!(matches!(err, CacheError::InvalidCapacity { capacity: 0, .. }));
    }

    #[test]
    fn test_get_returns_seeded_values() {
        let cache = filled(5);
        for i in 0..5 {
            assert_eq!(cache.get(&i.to_string()), Some(i));
        }
        assert_eq!(cache.get("missing"), None);
    }

    /// Validates that overflowing evicts exactly one entry.
    ///
    /// Assertions:
    /// - Confirms `len()` stays at capacity.
    /// - Confirms the new key is present.
    /// - Confirms exactly one seeded key is missing.
    #[test]
    fn test_capacity_exceeded_evicts_one() {
        let cache = filled(5);
        cache.put("5".to_string(), 5);

        assert_eq!(cache.len(), 5);
        assert_eq!(cache.get("5"), Some(5));
        let missing = (0..5).filter(|i| cache.get(&i.to_string()).is_none()).count();
        assert_eq!(missing, 1);
        assert_consistent(&cache);
    }

    #[test]
    fn test_updating_does_not_evict() {
        let cache = filled(5);
        cache.put("2".to_string(), 10);
        assert_eq!(cache.get("2"), Some(10));
        assert_eq!(cache.len(), 5);
        for i in [0, 1, 3, 4] {
            assert_eq!(cache.get(&i.to_string()), Some(i));
        }
    }

    #[test]
    fn test_remove_keeps_index_dense() {
        let cache = filled(5);
        assert_eq!(cache.remove("0"), Some(0));
        assert_eq!(cache.remove("0"), None);
        assert_eq!(cache.remove("4"), Some(4));
        assert_eq!(cache.len(), 3);
        assert_consistent(&cache);

        for i in 1..4 {
            assert_eq!(cache.get(&i.to_string()), Some(i));
        }
    }

    #[test]
    fn test_clear() {
        let cache = filled(5);
        cache.clear();
        assert!(cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());

        for i in 0..5 {
            cache.put(i.to_string(), i);
        }
        assert_eq!(cache.len(), 5);
        assert_consistent(&cache);
    }

    /// Validates `for_each` eviction by predicate.
    ///
    /// Assertions:
    /// - Confirms keys with value `< 3` are gone.
    /// - Confirms keys with value `>= 3` remain.
    #[test]
    fn test_for_each_evicts_matching_entries() {
        let cache = RandomReplacementCache::new(CacheConfig::random("sweep", 4)).unwrap();
        for i in 1..=4 {
            cache.put(i.to_string(), i);
        }

        cache.for_each(&mut |_, value| *value < 3);

        assert_eq!(cache.get("1"), None);
        assert_eq!(cache.get("2"), None);
        assert_eq!(cache.get("3"), Some(3));
        assert_eq!(cache.get("4"), Some(4));
        assert_consistent(&cache);
    }

    #[test]
    fn test_for_each_mutates_in_place() {
        let cache = filled(4);
        cache.for_each(&mut |_, value| {
            *value = 4;
            false
        });
        assert!(cache.snapshot().iter().all(|(_, value)| *value == 4));
    }

    #[test]
    fn test_seeded_eviction_is_reproducible() {
        let run = |seed| {
            let cache =
                RandomReplacementCache::with_seed(CacheConfig::random("seeded", 8), seed).unwrap();
            for i in 0..64 {
                cache.put(i.to_string(), i);
            }
            let mut keys: Vec<_> = cache.snapshot().into_iter().map(|(key, _)| key).collect();
            keys.sort();
            keys
        };

        assert_eq!(run(7), run(7));
    }

    /// Validates that the eviction victim is drawn uniformly.
    ///
    /// Assertions:
    /// - Ensures each of the four seeded keys is evicted within 20% of the
    ///   expected share over 4000 seeded trials.
    #[test]
    fn test_eviction_is_uniform() {
        const TRIALS: u64 = 4_000;
        let mut evicted: HashMap<String, u64> = HashMap::new();

        for seed in 0..TRIALS {
            let cache =
                RandomReplacementCache::with_seed(CacheConfig::random("uniform", 4), seed).unwrap();
            for i in 0..4 {
                cache.put(i.to_string(), i);
            }
            cache.put("new".to_string(), 99);

            for i in 0..4 {
                let key = i.to_string();
                if !cache.contains_key(&key) {
                    *evicted.entry(key).or_default() += 1;
                }
            }
        }

        let expected = TRIALS / 4;
        for i in 0..4 {
            let count = evicted.get(&i.to_string()).copied().unwrap_or(0);
            assert!(
                count > expected * 8 / 10 && count < expected * 12 / 10,
                "key {i} evicted {count} times, expected about {expected}"
            );
        }
    }

    #[test]
    fn test_stats_tracking() {
        let config = CacheConfig::builder()
            .name("stats")
            .capacity(2)
            .eviction_policy(crate::cache::EvictionPolicy::Random)
            .track_metrics(true)
            .build();
        let cache = RandomReplacementCache::new(config).unwrap();

        cache.put("a".to_string(), 1);
        cache.put("a".to_string(), 2);
        cache.put("b".to_string(), 3);
        cache.put("c".to_string(), 4);
        let _ = cache.get("c");
        let _ = cache.get("zzz");

        let stats = cache.stats();
        assert_eq!(stats.inserts, 3);
        assert_eq!(stats.updates, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 2);
    }

    /// Validates concurrent readers and writers.
    ///
    /// Assertions:
    /// - Ensures the dense array and map agree after all threads join.
    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(filled(32));
        let mut handles = vec![];

        for t in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..500 {
                    let key = format!("{}", (t * 13 + i) % 64);
                    match i % 4 {
                        0 => cache.put(key, i),
                        3 => {
                            let _ = cache.remove(&key);
                        }
                        _ => {
                            let _ = cache.get(&key);
                        }
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 32);
        assert_consistent(&cache);
    }
}
