//! Cache decorator with background sweeping
//!
//! [`SweptCache`] wraps any [`Cache`] together with any [`Sweeper`] and turns
//! a per-entry predicate into the sweeper's periodic callback: every tick
//! runs `for_each(predicate)` over the wrapped cache. Between ticks it is an
//! ordinary cache; every contract method delegates straight through.

use std::sync::Arc;
use std::time::Duration;

use super::stats::CacheStats;
use super::traits::Cache;
use crate::error::CacheResult;
use crate::sweeper::{ShutdownStatus, SweepConfig, SweepOnTime, Sweeper, SweeperState};

/// A cache paired with a background sweeper
pub struct SweptCache<C, S = SweepOnTime> {
    cache: Arc<C>,
    sweeper: S,
}

/// A cache swept on a fixed interval
///
/// ```
/// use std::time::Duration;
///
/// use sweepcache::cache::{Cache, CacheConfig, LruCache, TimeSweptCache};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), sweepcache::error::CacheError> {
/// let lru = LruCache::new(CacheConfig::lru("tokens", 16))?;
/// let cache = TimeSweptCache::with_interval(lru, Duration::from_millis(10))?;
/// cache.put("stale".to_string(), 0);
/// cache.put("fresh".to_string(), 1);
///
/// cache.start_sweeping(|_key: &str, value: &mut i32| *value == 0)?;
/// tokio::time::sleep(Duration::from_millis(40)).await;
/// cache.stop_sweeping().await?;
///
/// assert!(!cache.contains_key("stale"));
/// assert!(cache.contains_key("fresh"));
/// # Ok(())
/// # }
/// ```
pub type TimeSweptCache<C> = SweptCache<C, SweepOnTime>;

impl<C, S> SweptCache<C, S>
where
    S: Sweeper,
{
    /// Wrap `cache` with `sweeper`; the sweeper should be idle
    pub fn new(cache: C, sweeper: S) -> Self {
        Self::shared(Arc::new(cache), sweeper)
    }

    /// Wrap a cache that other owners also hold
    pub fn shared(cache: Arc<C>, sweeper: S) -> Self {
        Self { cache, sweeper }
    }

    /// Start sweeping: on every tick, entries for which `predicate` returns
    /// `true` are removed
    ///
    /// The predicate may also rewrite values in place. It runs under the
    /// wrapped cache's exclusive lock.
    ///
    /// # Errors
    /// Forwards the sweeper's lifecycle errors.
    pub fn start_sweeping<V, F>(&self, predicate: F) -> CacheResult<()>
    where
        C: Cache<V> + 'static,
        F: FnMut(&str, &mut V) -> bool + Send + 'static,
    {
        let cache = Arc::clone(&self.cache);
        let mut predicate = predicate;
        self.sweeper.start_sweeping(Box::new(move || (*cache).for_each(&mut predicate)))
    }

    /// Stop the background sweeper
    ///
    /// # Errors
    /// Forwards the sweeper's lifecycle errors.
    pub async fn stop_sweeping(&self) -> CacheResult<ShutdownStatus> {
        self.sweeper.stop_sweeping().await
    }

    /// Current sweeper state
    pub fn sweeper_state(&self) -> SweeperState {
        self.sweeper.state()
    }

    /// The wrapped cache
    pub fn inner(&self) -> &Arc<C> {
        &self.cache
    }

    /// The sweeper driving this cache
    pub fn sweeper(&self) -> &S {
        &self.sweeper
    }
}

impl<C> SweptCache<C, SweepOnTime> {
    /// Sweep `cache` every `interval`
    ///
    /// # Errors
    /// Returns [`CacheError::Config`](crate::error::CacheError) for a zero
    /// interval.
    pub fn with_interval(cache: C, interval: Duration) -> CacheResult<Self> {
        Self::with_config(cache, SweepConfig::new(interval))
    }

    /// Sweep `cache` with explicit timing
    pub fn with_config(cache: C, config: SweepConfig) -> CacheResult<Self> {
        Ok(Self::new(cache, SweepOnTime::new(config)?))
    }
}

impl<V, C, S> Cache<V> for SweptCache<C, S>
where
    C: Cache<V>,
    S: Sweeper,
{
    fn get(&self, key: &str) -> Option<V> {
        (*self.cache).get(key)
    }

    fn put(&self, key: String, value: V) {
        (*self.cache).put(key, value);
    }

    fn remove(&self, key: &str) -> Option<V> {
        (*self.cache).remove(key)
    }

    fn clear(&self) {
        (*self.cache).clear();
    }

    fn for_each(&self, predicate: &mut dyn FnMut(&str, &mut V) -> bool) {
        (*self.cache).for_each(predicate);
    }

    fn contains_key(&self, key: &str) -> bool {
        (*self.cache).contains_key(key)
    }

    fn snapshot(&self) -> Vec<(String, V)> {
        (*self.cache).snapshot()
    }

    fn len(&self) -> usize {
        (*self.cache).len()
    }

    fn capacity(&self) -> usize {
        (*self.cache).capacity()
    }

    fn name(&self) -> &str {
        (*self.cache).name()
    }

    fn stats(&self) -> CacheStats {
        (*self.cache).stats()
    }
}

impl<C, S> std::fmt::Debug for SweptCache<C, S>
where
    C: std::fmt::Debug,
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweptCache").field("cache", &self.cache).field("sweeper", &self.sweeper).finish()
    }
}
