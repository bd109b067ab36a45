//! Policy selection from configuration

use super::config::{CacheConfig, EvictionPolicy};
use super::lru::LruCache;
use super::random::RandomReplacementCache;
use super::stats::CacheStats;
use super::traits::Cache;
use crate::error::CacheResult;

/// A cache whose eviction policy is chosen at runtime from [`CacheConfig`]
///
/// ```
/// use sweepcache::cache::{Cache, CacheConfig, EvictionPolicy, PolicyCache};
///
/// let config = CacheConfig::builder().capacity(16).eviction_policy(EvictionPolicy::Random).build();
/// let cache = PolicyCache::new(config)?;
/// assert_eq!(cache.policy(), EvictionPolicy::Random);
///
/// cache.put("k".to_string(), "v".to_string());
/// assert_eq!(cache.get("k").as_deref(), Some("v"));
/// # Ok::<(), sweepcache::error::CacheError>(())
/// ```
#[derive(Debug)]
pub enum PolicyCache<V> {
    /// Least-recently-used eviction
    Lru(LruCache<V>),
    /// Uniform random eviction
    Random(RandomReplacementCache<V>),
}

impl<V> PolicyCache<V>
where
    V: Clone,
{
    /// Build the cache named by `config.eviction_policy`
    pub fn new(config: CacheConfig) -> CacheResult<Self> {
        match config.eviction_policy {
            EvictionPolicy::LRU => LruCache::new(config).map(Self::Lru),
            EvictionPolicy::Random => RandomReplacementCache::new(config).map(Self::Random),
        }
    }

    /// The policy backing this cache
    pub fn policy(&self) -> EvictionPolicy {
        match self {
            Self::Lru(_) => EvictionPolicy::LRU,
            Self::Random(_) => EvictionPolicy::Random,
        }
    }

    fn inner(&self) -> &dyn Cache<V>
    where
        V: Send + Sync,
    {
        match self {
            Self::Lru(cache) => cache,
            Self::Random(cache) => cache,
        }
    }
}

impl<V> Cache<V> for PolicyCache<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<V> {
        self.inner().get(key)
    }

    fn put(&self, key: String, value: V) {
        self.inner().put(key, value);
    }

    fn remove(&self, key: &str) -> Option<V> {
        self.inner().remove(key)
    }

    fn clear(&self) {
        self.inner().clear();
    }

    fn for_each(&self, predicate: &mut dyn FnMut(&str, &mut V) -> bool) {
        self.inner().for_each(predicate);
    }

    fn contains_key(&self, key: &str) -> bool {
        self.inner().contains_key(key)
    }

    fn snapshot(&self) -> Vec<(String, V)> {
        self.inner().snapshot()
    }

    fn len(&self) -> usize {
        self.inner().len()
    }

    fn capacity(&self) -> usize {
        self.inner().capacity()
    }

    fn name(&self) -> &str {
        self.inner().name()
    }

    fn stats(&self) -> CacheStats {
        self.inner().stats()
    }
}
