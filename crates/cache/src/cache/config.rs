//! Cache configuration types and builder patterns
//!
//! This module provides configuration types for choosing an eviction policy,
//! capacity, and diagnostic name for a cache.

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, CacheResult};

/// Default capacity used when none is configured
pub const DEFAULT_CAPACITY: usize = 1024;

/// Default diagnostic name
pub const DEFAULT_NAME: &str = "cache";

/// Eviction policy for cache entries when capacity is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EvictionPolicy {
    /// Least Recently Used - evicts the least recently read or written entry
    #[default]
    #[serde(rename = "lru")]
    LRU,
    /// Random replacement - evicts a uniformly random live entry
    #[serde(rename = "random", alias = "random_replacement")]
    Random,
}

impl std::fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LRU => write!(f, "lru"),
            Self::Random => write!(f, "random"),
        }
    }
}

/// Configuration for cache behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Name used only in log output
    pub name: String,

    /// Maximum number of entries; must be positive
    pub capacity: usize,

    /// Eviction policy when capacity is reached
    pub eviction_policy: EvictionPolicy,

    /// Whether to collect hit/miss/eviction counters
    pub track_metrics: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            capacity: DEFAULT_CAPACITY,
            eviction_policy: EvictionPolicy::LRU,
            track_metrics: false,
        }
    }
}

impl CacheConfig {
    /// Create a new configuration builder
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::default()
    }

    /// Quick preset for an LRU cache
    ///
    /// # Example
    /// ```
    /// use sweepcache::cache::{CacheConfig, EvictionPolicy};
    ///
    /// let config = CacheConfig::lru("sessions", 1000);
    /// assert_eq!(config.eviction_policy, EvictionPolicy::LRU);
    /// ```
    pub fn lru<N: Into<String>>(name: N, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
            eviction_policy: EvictionPolicy::LRU,
            track_metrics: false,
        }
    }

    /// Quick preset for a random-replacement cache
    ///
    /// # Example
    /// ```
    /// use sweepcache::cache::{CacheConfig, EvictionPolicy};
    ///
    /// let config = CacheConfig::random("geoip", 500);
    /// assert_eq!(config.eviction_policy, EvictionPolicy::Random);
    /// ```
    pub fn random<N: Into<String>>(name: N, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
            eviction_policy: EvictionPolicy::Random,
            track_metrics: false,
        }
    }

    /// Parse and validate a configuration from TOML text
    ///
    /// Missing fields fall back to [`CacheConfig::default`].
    ///
    /// ```
    /// use sweepcache::cache::{CacheConfig, EvictionPolicy};
    ///
    /// let config = CacheConfig::from_toml_str(
    ///     r#"
    ///     name = "dns"
    ///     capacity = 64
    ///     eviction_policy = "random"
    ///     "#,
    /// )
    /// .unwrap();
    /// assert_eq!(config.capacity, 64);
    /// assert_eq!(config.eviction_policy, EvictionPolicy::Random);
    /// ```
    pub fn from_toml_str(text: &str) -> CacheResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a working cache
    ///
    /// Capacity is never clamped: zero is an error.
    pub fn validate(&self) -> CacheResult<()> {
        if self.capacity == 0 {
            return Err(CacheError::invalid_capacity(&self.name, self.capacity));
        }
        Ok(())
    }
}

/// Builder for CacheConfig with fluent API
#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the diagnostic name
    pub fn name<N: Into<String>>(mut self, name: N) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set maximum number of entries
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Set eviction policy
    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.config.eviction_policy = policy;
        self
    }

    /// Enable or disable metrics tracking
    pub fn track_metrics(mut self, enabled: bool) -> Self {
        self.config.track_metrics = enabled;
        self
    }

    /// Build the configuration without validating it
    pub fn build(self) -> CacheConfig {
        self.config
    }
}
