//! Background sweepers
//!
//! A sweeper owns one background task that invokes a zero-argument callback
//! on a schedule. It knows nothing about caches; the
//! [`SweptCache`](crate::cache::SweptCache) decorator is what turns the
//! callback into a `for_each` pass over a cache.
//!
//! # Lifecycle
//!
//! ```text
//! Idle --start_sweeping--> Running --stop_sweeping--> Stopped
//! ```
//!
//! Transitions are compare-and-swap on an atomic, so concurrent callers race
//! safely: exactly one `start_sweeping` and one `stop_sweeping` succeed, the
//! rest get [`CacheError::SweeperState`](crate::error::CacheError). `Stopped`
//! is terminal; build a new sweeper to sweep again.

mod config;
mod on_time;

use std::fmt;

use async_trait::async_trait;

pub use self::config::{SweepConfig, DEFAULT_SHUTDOWN_TIMEOUT, DEFAULT_SWEEP_INTERVAL};
pub use self::on_time::SweepOnTime;
use crate::error::CacheResult;

/// Work performed on every sweep tick
pub type SweepCallback = Box<dyn FnMut() + Send + 'static>;

/// Run-state of a sweeper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SweeperState {
    /// Constructed, never started
    Idle = 0,
    /// Background task is sweeping
    Running = 1,
    /// Stop requested; terminal
    Stopped = 2,
}

impl SweeperState {
    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Idle,
            1 => Self::Running,
            _ => Self::Stopped,
        }
    }
}

impl fmt::Display for SweeperState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Outcome of a successful `stop_sweeping` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShutdownStatus {
    /// The task observed cancellation and exited within the timeout
    Stopped,
    /// The task did not exit within the timeout; it has been detached and
    /// will exit after its current sweep
    TimedOut,
}

/// A background task that runs a callback until told to stop
#[async_trait]
pub trait Sweeper: Send + Sync {
    /// Spawn the background task on the current Tokio runtime
    ///
    /// # Errors
    /// - [`CacheError::SweeperState`](crate::error::CacheError) unless the
    ///   sweeper is idle
    /// - [`CacheError::NoRuntime`](crate::error::CacheError) when called
    ///   outside a Tokio runtime; the sweeper stays idle
    fn start_sweeping(&self, callback: SweepCallback) -> CacheResult<()>;

    /// Cancel the task and wait, bounded by the shutdown timeout, for it to exit
    ///
    /// A timeout is reported as [`ShutdownStatus::TimedOut`], not an error.
    ///
    /// # Errors
    /// - [`CacheError::SweeperState`](crate::error::CacheError) unless the
    ///   sweeper is running
    /// - [`CacheError::TaskPanicked`](crate::error::CacheError) if the
    ///   callback panicked
    async fn stop_sweeping(&self) -> CacheResult<ShutdownStatus>;

    /// Current run-state
    fn state(&self) -> SweeperState;

    /// Whether the background task is active
    fn is_running(&self) -> bool {
        self.state() == SweeperState::Running
    }
}
