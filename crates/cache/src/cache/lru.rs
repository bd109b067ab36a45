//! Least-recently-used cache with `O(1)` get, put, and remove
//!
//! Entries live in a doubly linked list stored in a `Vec` of slots, ordered
//! from most recently used (head) to least recently used (tail), with a
//! key → slot index map alongside. Freed slots are recycled through a free
//! list so the backing vector never grows past the configured capacity.
//!
//! # Locking
//! `get` reorders the list, so every operation takes the same exclusive
//! mutex. `for_each` holds it for the full walk.
//!
//! # Eviction Policy
//! - A successful `put` or `get` promotes the entry to the MRU position.
//! - Inserting a new key into a full cache evicts the single LRU entry first.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::config::CacheConfig;
use super::stats::{CacheStats, MetricsCollector};
use super::traits::Cache;
use crate::error::CacheResult;

#[derive(Debug)]
struct Node<V> {
    key: Arc<str>,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Unsynchronized list + index; always accessed through the cache mutex
#[derive(Debug)]
struct LruList<V> {
    map: HashMap<Arc<str>, usize>,
    nodes: Vec<Option<Node<V>>>,
    free_list: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<V> LruList<V> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            head: None,
            tail: None,
        }
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn clear(&mut self) {
        self.map.clear();
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
    }

    fn node(&self, index: usize) -> Option<&Node<V>> {
        self.nodes.get(index).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, index: usize) -> Option<&mut Node<V>> {
        self.nodes.get_mut(index).and_then(Option::as_mut)
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.map.get(key).copied()
    }

    fn allocate_slot(&mut self, key: Arc<str>, value: V) -> usize {
        let node = Node { key, value, prev: None, next: None };
        if let Some(index) = self.free_list.pop() {
            self.nodes[index] = Some(node);
            index
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    /// Insert a new key at the MRU position. The key must not be present.
    fn push_front(&mut self, key: &str, value: V) {
        let key: Arc<str> = Arc::from(key);
        let index = self.allocate_slot(Arc::clone(&key), value);
        self.attach_front(index);
        self.map.insert(key, index);
    }

    fn promote(&mut self, index: usize) {
        if self.head == Some(index) {
            return;
        }
        self.detach(index);
        self.attach_front(index);
    }

    /// Unlink and free a slot, returning its node
    fn take(&mut self, index: usize) -> Option<Node<V>> {
        self.detach(index);
        let node = self.nodes.get_mut(index).and_then(Option::take)?;
        self.map.remove(&node.key);
        self.free_list.push(index);
        Some(node)
    }

    fn pop_back(&mut self) -> Option<Node<V>> {
        let index = self.tail?;
        self.take(index)
    }

    fn detach(&mut self, index: usize) {
        let (prev, next) = match self.node(index) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_index) => {
                if let Some(prev_node) = self.node_mut(prev_index) {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_index) => {
                if let Some(next_node) = self.node_mut(next_index) {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(index) {
            node.prev = None;
            node.next = None;
        }
    }

    fn attach_front(&mut self, index: usize) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(index) {
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(head_index) => {
                if let Some(head_node) = self.node_mut(head_index) {
                    head_node.prev = Some(index);
                }
            }
            None => self.tail = Some(index),
        }

        self.head = Some(index);
    }

    /// Walk MRU → LRU
    fn iter(&self) -> impl Iterator<Item = &Node<V>> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let node = self.node(cursor?)?;
            cursor = node.next;
            Some(node)
        })
    }
}

/// Thread-safe LRU cache keyed by string
///
/// # Example
/// ```
/// use sweepcache::cache::{Cache, CacheConfig, LruCache};
///
/// let cache = LruCache::new(CacheConfig::lru("sessions", 2))?;
/// cache.put("k1".to_string(), 1);
/// cache.put("k2".to_string(), 2);
/// assert_eq!(cache.get("k1"), Some(1));
/// cache.put("k3".to_string(), 3); // Evicts "k2"
/// assert!(cache.get("k2").is_none());
/// # Ok::<(), sweepcache::error::CacheError>(())
/// ```
pub struct LruCache<V> {
    name: String,
    capacity: usize,
    list: Mutex<LruList<V>>,
    metrics: MetricsCollector,
}

impl<V> LruCache<V>
where
    V: Clone,
{
    /// Create an LRU cache from `config`
    ///
    /// `config.eviction_policy` is not consulted; use
    /// [`PolicyCache`](super::PolicyCache) to pick the policy from config.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`](crate::error::CacheError) when
    /// the capacity is zero.
    pub fn new(config: CacheConfig) -> CacheResult<Self> {
        config.validate()?;
        Ok(Self {
            list: Mutex::new(LruList::with_capacity(config.capacity)),
            capacity: config.capacity,
            metrics: MetricsCollector::new(config.track_metrics),
            name: config.name,
        })
    }

    /// Shorthand for `LruCache::new(CacheConfig::lru(name, capacity))`
    pub fn with_capacity<N: Into<String>>(name: N, capacity: usize) -> CacheResult<Self> {
        Self::new(CacheConfig::lru(name, capacity))
    }

    /// Read a value without changing recency order
    pub fn peek(&self, key: &str) -> Option<V> {
        let list = self.list.lock();
        list.index_of(key).and_then(|index| list.node(index)).map(|node| node.value.clone())
    }

    /// Entry at the MRU position, or `None` when empty
    pub fn most_recently_used(&self) -> Option<(String, V)> {
        let list = self.list.lock();
        list.head
            .and_then(|index| list.node(index))
            .map(|node| (node.key.to_string(), node.value.clone()))
    }

    /// Entry at the LRU position (next to be evicted), or `None` when empty
    pub fn least_recently_used(&self) -> Option<(String, V)> {
        let list = self.list.lock();
        list.tail
            .and_then(|index| list.node(index))
            .map(|node| (node.key.to_string(), node.value.clone()))
    }
}

impl<V> Cache<V> for LruCache<V>
where
    V: Clone + Send,
{
    fn get(&self, key: &str) -> Option<V> {
        let mut list = self.list.lock();
        let Some(index) = list.index_of(key) else {
            self.metrics.record_miss();
            return None;
        };

        list.promote(index);
        self.metrics.record_hit();
        list.node(index).map(|node| node.value.clone())
    }

    fn put(&self, key: String, value: V) {
        let mut list = self.list.lock();

        if let Some(index) = list.index_of(&key) {
            if let Some(node) = list.node_mut(index) {
                node.value = value;
            }
            list.promote(index);
            self.metrics.record_update();
            debug!(cache = %self.name, key = %key, "Updated cache element");
            return;
        }

        if list.len() >= self.capacity {
            if let Some(evicted) = list.pop_back() {
                self.metrics.record_eviction();
                debug!(cache = %self.name, key = %evicted.key, "Evicted least recently used element");
            }
        }

        list.push_front(&key, value);
        self.metrics.record_insert();
        debug!(cache = %self.name, key = %key, "Added cache element");
    }

    fn remove(&self, key: &str) -> Option<V> {
        let mut list = self.list.lock();
        let index = list.index_of(key)?;
        let node = list.take(index)?;
        self.metrics.record_removal();
        debug!(cache = %self.name, key = %key, "Removed cache element");
        Some(node.value)
    }

    fn clear(&self) {
        self.list.lock().clear();
        debug!(cache = %self.name, "Cleared cache");
    }

    fn for_each(&self, predicate: &mut dyn FnMut(&str, &mut V) -> bool) {
        let mut list = self.list.lock();
        let mut cursor = list.head;
        let mut removed = 0usize;

        while let Some(index) = cursor {
            let Some(node) = list.node_mut(index) else { break };
            cursor = node.next;
            if predicate(&*node.key, &mut node.value) {
                list.take(index);
                self.metrics.record_removal();
                removed += 1;
            }
        }

        if removed > 0 {
            debug!(cache = %self.name, removed, "Removed elements during sweep");
        }
    }

    fn contains_key(&self, key: &str) -> bool {
        self.list.lock().map.contains_key(key)
    }

    fn snapshot(&self) -> Vec<(String, V)> {
        let list = self.list.lock();
        list.iter().map(|node| (node.key.to_string(), node.value.clone())).collect()
    }

    fn len(&self) -> usize {
        self.list.lock().len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> CacheStats {
        self.metrics.snapshot(self.list.lock().len(), self.capacity)
    }
}

impl<V> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("name", &self.name)
            .field("len", &self.list.lock().len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::lru.
    use std::thread;

    use super::*;
    use crate::error::CacheError;

    fn filled(capacity: usize) -> LruCache<i32> {
        let cache = LruCache::with_capacity("LRUUnitTest", capacity).unwrap();
        for i in 0..capacity {
            cache.put(i.to_string(), i as i32);
        }
        cache
    }

    /// Asserts the list and index agree with each other and with `len`.
    fn assert_consistent(cache: &LruCache<i32>) {
        let list = cache.list.lock();
        let walked: Vec<_> = list.iter().map(|node| node.key.clone()).collect();
        assert_eq!(walked.len(), list.map.len());
        for key in &walked {
            let index = list.map[key];
            assert_eq!(&list.node(index).unwrap().key, key);
        }
        assert!(list.len() <= cache.capacity);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = LruCache::<i32>::with_capacity("zero", 0).unwrap_err();
        assert!(matches!(err, CacheError::InvalidCapacity { capacity: 0, .. }));
    }

    /// Validates that every seeded value can be read back and is promoted.
    ///
    /// Assertions:
    /// - Confirms `cache.get(i)` equals `Some(i)`.
    /// - Confirms `most_recently_used()` is the key just read.
    #[test]
    fn test_get_promotes_to_most_recently_used() {
        let cache = filled(5);
        for i in 0..5 {
            assert_eq!(cache.get(&i.to_string()), Some(i));
            assert_eq!(cache.most_recently_used(), Some((i.to_string(), i)));
        }
    }

    #[test]
    fn test_most_and_least_recently_used_after_fill() {
        let cache = filled(5);
        assert_eq!(cache.most_recently_used(), Some(("4".to_string(), 4)));
        assert_eq!(cache.least_recently_used(), Some(("0".to_string(), 0)));
    }

    #[test]
    fn test_most_and_least_recently_used_empty() {
        let cache = LruCache::<i32>::with_capacity("empty", 3).unwrap();
        assert_eq!(cache.most_recently_used(), None);
        assert_eq!(cache.least_recently_used(), None);
    }

    /// Validates the canonical a/b/c/d eviction order.
    ///
    /// Assertions:
    /// - Confirms `most_recently_used()` equals `("a", 1)` after `get("a")`.
    /// - Confirms `"b"` is evicted by `put("d")`.
    /// - Confirms `least_recently_used()` equals `("c", 3)` afterwards.
    #[test]
    fn test_lru_eviction_determinism() {
        let cache = LruCache::with_capacity("abc", 3).unwrap();
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);
        cache.put("c".to_string(), 3);

        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.most_recently_used(), Some(("a".to_string(), 1)));
        assert_eq!(cache.least_recently_used(), Some(("b".to_string(), 2)));

        cache.put("d".to_string(), 4);
        assert_eq!(cache.least_recently_used(), Some(("c".to_string(), 3)));

        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("c"), Some(3));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_capacity_exceeded_evicts_first_inserted() {
        let cache = filled(5);
        cache.put("5".to_string(), 5);
        assert_eq!(cache.get("0"), None);
        assert_eq!(cache.len(), 5);
    }

    /// Validates updating an existing key.
    ///
    /// Assertions:
    /// - Confirms the value is replaced.
    /// - Confirms the entry moves to the MRU position.
    /// - Confirms `len()` is unchanged.
    #[test]
    fn test_updating_cache_value() {
        let cache = filled(5);
        cache.put("2".to_string(), 10);

        assert_eq!(cache.most_recently_used(), Some(("2".to_string(), 10)));
        assert_eq!(cache.get("2"), Some(10));
        assert_eq!(cache.len(), 5);
    }

    #[test]
    fn test_remove() {
        let cache = filled(5);
        assert_eq!(cache.remove("2"), Some(2));
        assert_eq!(cache.get("2"), None);
        assert_eq!(cache.remove("2"), None);
        assert_eq!(cache.len(), 4);
        assert_consistent(&cache);
    }

    #[test]
    fn test_remove_head_and_tail() {
        let cache = filled(3);
        cache.remove("2");
        cache.remove("0");
        assert_eq!(cache.most_recently_used(), Some(("1".to_string(), 1)));
        assert_eq!(cache.least_recently_used(), Some(("1".to_string(), 1)));
        assert_consistent(&cache);
    }

    #[test]
    fn test_peek_does_not_promote() {
        let cache = filled(3);
        assert_eq!(cache.peek("0"), Some(0));
        assert_eq!(cache.least_recently_used(), Some(("0".to_string(), 0)));
        assert!(cache.contains_key("0"));
        assert!(!cache.contains_key("9"));
    }

    /// Validates `clear` on populated and empty caches.
    ///
    /// Assertions:
    /// - Confirms `len()` equals `0` after clearing.
    /// - Confirms every previous key misses.
    /// - Confirms the cache accepts `capacity` entries again.
    #[test]
    fn test_clear() {
        let cache = filled(5);
        cache.clear();
        assert_eq!(cache.len(), 0);
        for i in 0..5 {
            assert_eq!(cache.get(&i.to_string()), None);
        }

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
        let cache = LruCache::with_capacity("sweep", 4).unwrap();
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
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn test_for_each_remove_all() {
        let cache = filled(4);
        cache.for_each(&mut |_, _| true);
        assert!(cache.is_empty());
        assert_eq!(cache.most_recently_used(), None);
        assert_consistent(&cache);
    }

    #[test]
    fn test_snapshot_is_mru_ordered() {
        let cache = filled(3);
        let _ = cache.get("0");
        let keys: Vec<_> = cache.snapshot().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["0", "2", "1"]);
    }

    /// Validates that slots are recycled instead of growing the backing vec.
    ///
    /// Assertions:
    /// - Ensures `nodes.len()` never exceeds capacity.
    #[test]
    fn test_slots_are_recycled() {
        let cache = LruCache::with_capacity("churn", 4).unwrap();
        for i in 0..1_000 {
            cache.put(i.to_string(), i);
            if i % 3 == 0 {
                cache.remove(&(i - 1).to_string());
            }
        }
        assert!(cache.list.lock().nodes.len() <= 4);
        assert_consistent(&cache);
    }

    #[test]
    fn test_stats_tracking() {
        let config = CacheConfig::builder().name("stats").capacity(2).track_metrics(true).build();
        let cache = LruCache::new(config).unwrap();

        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);
        cache.put("a".to_string(), 3);
        cache.put("c".to_string(), 4);
        let _ = cache.get("a");
        let _ = cache.get("b");

        let stats = cache.stats();
        assert_eq!(stats.inserts, 3);
        assert_eq!(stats.updates, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 2);
        assert_eq!(stats.capacity, 2);
    }

    /// Validates concurrent mixed operations keep the index consistent.
    ///
    /// Assertions:
    /// - Ensures the list/index invariant holds after all threads join.
    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(LruCache::with_capacity("concurrent", 32).unwrap());
        let mut handles = vec![];

        for t in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..500 {
                    let key = format!("{}", (t * 7 + i) % 64);
                    match i % 3 {
                        0 => cache.put(key, i),
                        1 => {
                            let _ = cache.get(&key);
                        }
                        _ => {
                            let _ = cache.remove(&key);
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
