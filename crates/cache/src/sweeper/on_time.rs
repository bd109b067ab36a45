//! Fixed-interval sweeper
//!
//! Spawns one Tokio task that sleeps for the configured interval, runs the
//! callback on the blocking pool, and repeats until its cancellation token
//! fires. Shutdown is
//! bounded: `stop_sweeping` waits at most `shutdown_timeout` for the task,
//! then logs and detaches it.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::{ShutdownStatus, SweepCallback, SweepConfig, Sweeper, SweeperState};
use crate::error::{CacheError, CacheResult};

/// Sweeper that invokes its callback once per interval
///
/// ```
/// use std::time::Duration;
///
/// use sweepcache::sweeper::{ShutdownStatus, SweepOnTime, Sweeper};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), sweepcache::error::CacheError> {
/// let sweeper = SweepOnTime::with_interval(Duration::from_millis(10))?;
/// sweeper.start_sweeping(Box::new(|| {}))?;
/// tokio::time::sleep(Duration::from_millis(35)).await;
/// assert_eq!(sweeper.stop_sweeping().await?, ShutdownStatus::Stopped);
/// assert!(sweeper.sweeps_completed() >= 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SweepOnTime {
    config: SweepConfig,
    state: AtomicU8,
    cancellation_token: CancellationToken,
    task_handle: Mutex<Option<JoinHandle<()>>>,
    sweeps: Arc<AtomicU64>,
}

impl SweepOnTime {
    /// Create an idle sweeper
    ///
    /// # Errors
    /// Returns [`CacheError::Config`] for a zero interval or timeout.
    pub fn new(config: SweepConfig) -> CacheResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: AtomicU8::new(SweeperState::Idle as u8),
            cancellation_token: CancellationToken::new(),
            task_handle: Mutex::new(None),
            sweeps: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Create an idle sweeper with the default shutdown timeout
    pub fn with_interval(interval: Duration) -> CacheResult<Self> {
        Self::new(SweepConfig::new(interval))
    }

    /// Configured timing
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Number of callback invocations that have returned
    pub fn sweeps_completed(&self) -> u64 {
        self.sweeps.load(Ordering::Acquire)
    }

    fn transition(&self, from: SweeperState, to: SweeperState) -> Result<(), SweeperState> {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(SweeperState::from_u8)
    }

    async fn sweep_loop(
        callback: SweepCallback,
        interval: Duration,
        cancel: CancellationToken,
        sweeps: Arc<AtomicU64>,
    ) {
        let callback = Arc::new(Mutex::new(callback));
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Sweep loop cancelled");
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }

            // The callback locks the cache for a full pass; keep it off the
            // async workers so timers and shutdown deadlines keep firing.
            let job = Arc::clone(&callback);
            let run = move || {
                let mut callback = job.lock();
                (*callback)();
            };
            match tokio::task::spawn_blocking(run).await {
                Ok(()) => {
                    let count = sweeps.fetch_add(1, Ordering::AcqRel) + 1;
                    debug!(sweep = count, "Sweep completed");
                }
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(_) => {
                    debug!("Sweep job cancelled by the runtime");
                    break;
                }
            }
        }
    }
}

#[async_trait]
impl Sweeper for SweepOnTime {
    #[instrument(skip(self, callback), fields(interval = ?self.config.interval))]
    fn start_sweeping(&self, callback: SweepCallback) -> CacheResult<()> {
        let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        // Held across the transition so a concurrent stop sees the handle.
        let mut task_handle = self.task_handle.lock();
        self.transition(SweeperState::Idle, SweeperState::Running)
            .map_err(|state| CacheError::sweeper_state("start", state))?;

        let cancel = self.cancellation_token.clone();
        let sweeps = Arc::clone(&self.sweeps);
        let interval = self.config.interval;
        *task_handle = Some(runtime.spawn(Self::sweep_loop(callback, interval, cancel, sweeps)));

        info!("Sweeper started");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn stop_sweeping(&self) -> CacheResult<ShutdownStatus> {
        self.transition(SweeperState::Running, SweeperState::Stopped)
            .map_err(|state| CacheError::sweeper_state("stop", state))?;

        info!("Stopping sweeper");
        self.cancellation_token.cancel();

        let handle = self.task_handle.lock().take();
        let Some(handle) = handle else {
            return Ok(ShutdownStatus::Stopped);
        };

        let timeout = self.config.shutdown_timeout;
        match tokio::time::timeout(timeout, handle).await {
            Ok(Ok(())) => {
                info!("Successful shutdown of sweeper");
                Ok(ShutdownStatus::Stopped)
            }
            Ok(Err(e)) if e.is_cancelled() => {
                info!("Sweep task was cancelled by the runtime");
                Ok(ShutdownStatus::Stopped)
            }
            Ok(Err(e)) => {
                warn!("Sweep task panicked: {}", e);
                Err(CacheError::TaskPanicked(e.to_string()))
            }
            Err(_) => {
                warn!(
                    timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    "Failed to properly shutdown sweeper"
                );
                Ok(ShutdownStatus::TimedOut)
            }
        }
    }

    fn state(&self) -> SweeperState {
        SweeperState::from_u8(self.state.load(Ordering::Acquire))
    }
}

impl Drop for SweepOnTime {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("SweepOnTime dropped while running; cancelling");
            self.cancellation_token.cancel();
        }
    }
}
