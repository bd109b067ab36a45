//! String-keyed caches with interchangeable eviction policies
//!
//! Every cache implements the [`Cache`] trait, so callers can swap policies
//! without touching call sites.
//!
//! # Features
//!
//! - **Thread-safe**: every method takes `&self`; share a cache behind `Arc`
//! - **LRU**: `O(1)` get/put/remove with deterministic least-recently-used
//!   eviction ([`LruCache`])
//! - **Random replacement**: `O(1)` uniform-random eviction with lock-free
//!   concurrent reads ([`RandomReplacementCache`])
//! - **Sweeping**: a background task that periodically runs a predicate over
//!   every entry, removing or rewriting it ([`SweptCache`], `runtime` feature)
//! - **Metrics tracking**: optional hit/miss/eviction counters
//!
//! # Examples
//!
//! ## Simple LRU Cache
//! ```
//! use sweepcache::cache::{Cache, CacheConfig, LruCache};
//!
//! let cache = LruCache::new(CacheConfig::lru("sessions", 100))?;
//! cache.put("key".to_string(), 42);
//! assert_eq!(cache.get("key"), Some(42));
//! # Ok::<(), sweepcache::error::CacheError>(())
//! ```
//!
//! ## Policy chosen from configuration
//! ```
//! use sweepcache::cache::{Cache, CacheConfig, PolicyCache};
//!
//! let config = CacheConfig::from_toml_str(
//!     r#"
//!     name = "geoip"
//!     capacity = 500
//!     eviction_policy = "random"
//!     track_metrics = true
//!     "#,
//! )?;
//! let cache: PolicyCache<String> = PolicyCache::new(config)?;
//! cache.put("1.1.1.1".to_string(), "AU".to_string());
//! assert_eq!(cache.stats().inserts, 1);
//! # Ok::<(), sweepcache::error::CacheError>(())
//! ```
//!
//! ## Sweeping entries in place
//! ```
//! use sweepcache::cache::{Cache, CacheConfig, LruCache};
//!
//! let cache = LruCache::new(CacheConfig::lru("scores", 8))?;
//! for i in 1..=4 {
//!     cache.put(i.to_string(), i);
//! }
//!
//! // Drop small values, double the rest
//! cache.for_each(&mut |_key, value| {
//!     *value *= 2;
//!     *value < 5
//! });
//! assert_eq!(cache.len(), 2);
//! assert_eq!(cache.get("4"), Some(8));
//! # Ok::<(), sweepcache::error::CacheError>(())
//! ```

pub mod config;
mod lru;
mod policy;
mod random;
pub mod stats;
#[cfg(feature = "runtime")]
mod swept;
mod traits;

pub use config::{CacheConfig, CacheConfigBuilder, EvictionPolicy};
pub use lru::LruCache;
pub use policy::PolicyCache;
pub use random::RandomReplacementCache;
pub use stats::CacheStats;
#[cfg(feature = "runtime")]
pub use swept::{SweptCache, TimeSweptCache};
pub use traits::Cache;
