//! Error types shared by the cache and sweeper modules
//!
//! Cache operations themselves are infallible: a missing key is reported
//! through `Option`, never through an error. The conditions that *are*
//! reportable fall into three groups:
//!
//! | Group | Variant | When |
//! |-------|---------|------|
//! | **Configuration** | `InvalidCapacity`, `Config`, `ConfigParse` | Rejected eagerly at construction |
//! | **Lifecycle** | `SweeperState`, `NoRuntime` | Sweeper started/stopped out of order |
//! | **Internal** | `TaskPanicked` | Background sweep task panicked |
//!
//! A sweeper that fails to acknowledge shutdown in time is *not* an error;
//! it is logged and surfaced as
//! [`ShutdownStatus::TimedOut`](crate::sweeper::ShutdownStatus).
//!
//! ## Classification
//!
//! Every [`CacheError`] reports an [`ErrorSeverity`] and whether retrying the
//! same call could succeed, so callers can route errors to the right log
//! level without matching on every variant.
//!
//! ```
//! use sweepcache::cache::{CacheConfig, LruCache};
//! use sweepcache::error::{CacheError, ErrorSeverity};
//!
//! let err = LruCache::<i32>::new(CacheConfig::lru("sessions", 0)).unwrap_err();
//! assert!(matches!(err, CacheError::InvalidCapacity { .. }));
//! assert_eq!(err.severity(), ErrorSeverity::Error);
//! assert!(!err.is_retryable());
//! ```

use std::fmt;

use thiserror::Error;

/// Standard result type using [`CacheError`]
pub type CacheResult<T> = Result<T, CacheError>;

/// Severity levels used for monitoring and log routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Expected condition, informational only
    Info,
    /// Degraded but operational
    Warning,
    /// Failure requiring attention
    Error,
    /// Invariant violated
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Errors raised by cache construction and sweeper lifecycle management
#[derive(Debug, Error)]
pub enum CacheError {
    /// Capacity must be a positive integer
    #[error("Cache '{name}' requires a positive capacity (got {capacity})")]
    InvalidCapacity { name: String, capacity: usize },

    /// Any other invalid configuration value
    #[error("Configuration error in field '{field}': {message}")]
    Config { field: String, message: String },

    /// Configuration text could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Sweeper lifecycle call made from the wrong state
    #[error("Cannot {operation} sweeper while it is {state}")]
    SweeperState { operation: &'static str, state: String },

    /// Sweeping requires an active Tokio runtime
    #[error("No active Tokio runtime available to spawn the sweep task")]
    NoRuntime,

    /// Background sweep task panicked before acknowledging shutdown
    #[error("Sweep task panicked: {0}")]
    TaskPanicked(String),
}

impl CacheError {
    /// Create a configuration error for a specific field
    pub fn config<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Config { field: field.into(), message: message.into() }
    }

    /// Create an invalid-capacity error for the named cache
    pub fn invalid_capacity<N: Into<String>>(name: N, capacity: usize) -> Self {
        Self::InvalidCapacity { name: name.into(), capacity }
    }

    /// Create a lifecycle error for a sweeper in the wrong state
    pub fn sweeper_state<S: fmt::Display>(operation: &'static str, state: S) -> Self {
        Self::SweeperState { operation, state: state.to_string() }
    }

    /// Whether repeating the same call could succeed without changing input
    pub fn is_retryable(&self) -> bool {
        // A missing runtime can appear once the caller enters one.
        matches!(self, Self::NoRuntime)
    }

    /// Severity of this error for monitoring
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidCapacity { .. } | Self::Config { .. } | Self::ConfigParse(_) => {
                ErrorSeverity::Error
            }
            Self::SweeperState { .. } | Self::NoRuntime => ErrorSeverity::Warning,
            Self::TaskPanicked(_) => ErrorSeverity::Critical,
        }
    }

    /// Whether this error requires immediate attention
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for error.
    use super::*;

    /// Validates `CacheError::invalid_capacity` display and classification.
    ///
    /// Assertions:
    /// - Confirms the message names the cache and capacity.
    /// - Confirms severity is `Error` and the error is not retryable.
    #[test]
    fn test_invalid_capacity_classification() {
        let err = CacheError::invalid_capacity("geoip", 0);
        assert_eq!(err.to_string(), "Cache 'geoip' requires a positive capacity (got 0)");
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert!(!err.is_retryable());
        assert!(!err.is_critical());
    }

    /// Validates `CacheError::sweeper_state` message formatting.
    ///
    /// Assertions:
    /// - Confirms the operation and state appear in the message.
    /// - Confirms severity is `Warning`.
    #[test]
    fn test_sweeper_state_message() {
        let err = CacheError::sweeper_state("start", "running");
        assert_eq!(err.to_string(), "Cannot start sweeper while it is running");
        assert_eq!(err.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn test_no_runtime_is_retryable() {
        assert!(CacheError::NoRuntime.is_retryable());
        assert!(CacheError::TaskPanicked("boom".into()).is_critical());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(ErrorSeverity::Info < ErrorSeverity::Warning);
        assert!(ErrorSeverity::Error < ErrorSeverity::Critical);
        assert_eq!(ErrorSeverity::Critical.to_string(), "critical");
    }
}
