//! The cache contract shared by every eviction policy

use std::sync::Arc;

use super::stats::CacheStats;

/// Capability set every eviction policy implements
///
/// All methods take `&self`; implementations guard their state with their
/// own lock, so a cache can be shared across threads behind an `Arc`.
///
/// "Not found" is never an error: lookups return `None` and removing an
/// absent key is a no-op.
pub trait Cache<V>: Send + Sync {
    /// Look up `key`, returning a clone of its value
    ///
    /// Policies that track recency treat this as a use of the entry.
    fn get(&self, key: &str) -> Option<V>;

    /// Insert or replace the value for `key`, evicting if the cache is full
    fn put(&self, key: String, value: V);

    /// Remove `key`, returning its value if it was present
    fn remove(&self, key: &str) -> Option<V>;

    /// Remove every entry; capacity is retained
    fn clear(&self);

    /// Visit every entry under exclusive access
    ///
    /// Entries for which `predicate` returns `true` are removed. The predicate
    /// may also mutate the value in place. It must not call back into the
    /// same cache.
    fn for_each(&self, predicate: &mut dyn FnMut(&str, &mut V) -> bool);

    /// Whether `key` is present, without counting as a use
    fn contains_key(&self, key: &str) -> bool;

    /// Point-in-time copy of every entry
    fn snapshot(&self) -> Vec<(String, V)>;

    /// Number of live entries
    fn len(&self) -> usize;

    /// Whether the cache holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries
    fn capacity(&self) -> usize;

    /// Diagnostic name supplied at construction
    fn name(&self) -> &str;

    /// Counter snapshot; all zero unless metrics tracking is enabled
    fn stats(&self) -> CacheStats;
}

impl<V, C> Cache<V> for Arc<C>
where
    C: Cache<V> + ?Sized,
{
    fn get(&self, key: &str) -> Option<V> {
        (**self).get(key)
    }

    fn put(&self, key: String, value: V) {
        (**self).put(key, value);
    }

    fn remove(&self, key: &str) -> Option<V> {
        (**self).remove(key)
    }

    fn clear(&self) {
        (**self).clear();
    }

    fn for_each(&self, predicate: &mut dyn FnMut(&str, &mut V) -> bool) {
        (**self).for_each(predicate);
    }

    fn contains_key(&self, key: &str) -> bool {
        (**self).contains_key(key)
    }

    fn snapshot(&self) -> Vec<(String, V)> {
        (**self).snapshot()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn stats(&self) -> CacheStats {
        (**self).stats()
    }
}
