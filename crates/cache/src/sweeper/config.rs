//! Sweeper timing configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, CacheResult};
use crate::utils::duration_millis;

/// Default time between sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Default bound on how long `stop_sweeping` waits for the task to finish
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Timing for a [`SweepOnTime`](super::SweepOnTime) sweeper
///
/// Durations are written as milliseconds in TOML and JSON:
///
/// ```
/// use std::time::Duration;
///
/// use sweepcache::sweeper::SweepConfig;
///
/// let config = SweepConfig::from_toml_str("interval = 500").unwrap();
/// assert_eq!(config.interval, Duration::from_millis(500));
/// assert_eq!(config.shutdown_timeout, Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Time between the end of one sweep and the start of the next
    #[serde(with = "duration_millis")]
    pub interval: Duration,

    /// How long `stop_sweeping` waits before reporting a timed-out shutdown
    #[serde(with = "duration_millis")]
    pub shutdown_timeout: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self { interval: DEFAULT_SWEEP_INTERVAL, shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT }
    }
}

impl SweepConfig {
    /// Sweep every `interval` with the default shutdown timeout
    pub fn new(interval: Duration) -> Self {
        Self { interval, ..Self::default() }
    }

    /// Override the shutdown timeout
    #[must_use]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(text: &str) -> CacheResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject zero durations
    ///
    /// A zero interval would spin the sweep task; a zero timeout would report
    /// every shutdown as timed out.
    pub fn validate(&self) -> CacheResult<()> {
        if self.interval.is_zero() {
            return Err(CacheError::config("interval", "sweep interval must be greater than zero"));
        }
        if self.shutdown_timeout.is_zero() {
            return Err(CacheError::config(
                "shutdown_timeout",
                "shutdown timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}
