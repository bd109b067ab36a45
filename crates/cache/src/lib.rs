//! In-memory caches with pluggable eviction and background sweeping.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: the cache contract, LRU and random-replacement caches,
//!   configuration, errors
//! - `runtime` (default): the Tokio-driven sweeper and the swept-cache
//!   decorator
//!
//! # Logging
//!
//! All diagnostics go through `tracing`. Cache mutations log at `debug` with
//! the cache name and key; sweeper lifecycle events log at `info`, and a
//! sweeper that misses its shutdown deadline logs at `warn`. Install any
//! subscriber to see them; without one nothing is emitted.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod cache;
#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "foundation")]
pub mod utils;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod sweeper;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use cache::{
    Cache, CacheConfig, CacheStats, EvictionPolicy, LruCache, PolicyCache, RandomReplacementCache,
};
#[cfg(feature = "runtime")]
pub use cache::{SweptCache, TimeSweptCache};
#[cfg(feature = "foundation")]
pub use error::{CacheError, CacheResult, ErrorSeverity};
#[cfg(feature = "runtime")]
pub use sweeper::{ShutdownStatus, SweepConfig, SweepOnTime, Sweeper, SweeperState};
