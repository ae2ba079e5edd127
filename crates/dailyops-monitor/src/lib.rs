//! Recurring expiry-check scheduler for the DailyOps session monitor.
//!
//! Detecting expiry must not wait for a user action, so the facade runs a
//! recurring check while a session is active. This crate provides only the
//! timing half: [`ExpiryScheduler`] yields one check per interval until
//! stopped, and [`MonitorHandle`] is the idempotent off-switch held by
//! whoever owns the lifecycle. What a check *does* (reading the store,
//! tripping the expiry transition) lives with the caller.
//!
//! # Integration
//!
//! The scheduler is designed to drive a spawned loop:
//!
//! ```ignore
//! let (mut scheduler, handle) = ExpiryScheduler::new(MonitorConfig::default());
//! tokio::spawn(async move {
//!     while scheduler.wait_for_check().await.is_some() {
//!         // recompute expiry from the store; break once tripped
//!     }
//! });
//! // ... later, on any exit from the authenticated phase:
//! handle.stop(); // idempotent — safe to call twice, or after the loop ended
//! ```
//!
//! Cancellation is a correctness requirement, not a nicety: a scheduler
//! left ticking after teardown is a resource leak. Stopping is therefore
//! possible from outside the loop (the handle), idempotent, and also
//! implied by dropping the handle.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How often the session is re-checked for expiry: every 60 seconds.
pub const CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration for the expiry scheduler.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Delay between consecutive checks.
    ///
    /// Default: [`CHECK_INTERVAL`] (60 seconds).
    pub check_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval: CHECK_INTERVAL,
        }
    }
}

impl MonitorConfig {
    /// Creates a config with a specific interval.
    pub fn with_interval(check_interval: Duration) -> Self {
        Self { check_interval }
    }

    /// Fixes any out-of-range values so the config is safe to use.
    ///
    /// A zero interval would spin the check loop; it is replaced by the
    /// default.
    pub fn validated(mut self) -> Self {
        if self.check_interval.is_zero() {
            warn!("check_interval is zero — falling back to 60 seconds");
            self.check_interval = CHECK_INTERVAL;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// MonitorHandle
// ---------------------------------------------------------------------------

/// The off-switch for a running [`ExpiryScheduler`].
///
/// Held by the component that owns the session lifecycle while the
/// scheduler itself is moved into the spawned check loop. Stopping twice,
/// or stopping after the loop already ended, is a no-op.
#[derive(Debug)]
pub struct MonitorHandle {
    stop_tx: watch::Sender<bool>,
}

impl MonitorHandle {
    /// Stops the scheduler. Idempotent.
    pub fn stop(&self) {
        let was_stopped = self.stop_tx.send_replace(true);
        if was_stopped {
            trace!("monitor already stopped");
        } else {
            debug!("monitor stopped");
        }
    }

    /// Whether the scheduler has been stopped.
    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }
}

// ---------------------------------------------------------------------------
// ExpiryScheduler
// ---------------------------------------------------------------------------

/// Yields one expiry check per interval until stopped.
pub struct ExpiryScheduler {
    config: MonitorConfig,
    /// When the next check fires.
    next_check: Instant,
    /// Checks yielded so far.
    checks: u64,
    stop_rx: watch::Receiver<bool>,
}

impl ExpiryScheduler {
    /// Creates a scheduler and its stop handle. The first check fires one
    /// full interval from now.
    pub fn new(config: MonitorConfig) -> (Self, MonitorHandle) {
        let config = config.validated();
        let (stop_tx, stop_rx) = watch::channel(false);

        debug!(
            interval_secs = config.check_interval.as_secs_f64(),
            "expiry scheduler created"
        );

        (
            Self {
                next_check: Instant::now() + config.check_interval,
                config,
                checks: 0,
                stop_rx,
            },
            MonitorHandle { stop_tx },
        )
    }

    /// Creates a scheduler with the default interval.
    pub fn with_default_interval() -> (Self, MonitorHandle) {
        Self::new(MonitorConfig::default())
    }

    /// Waits until the next check is due and returns its number, or `None`
    /// once the scheduler is stopped — the caller's loop ends there.
    ///
    /// Stopping wins races: if the stop arrives while a check is due, the
    /// check is discarded. A dropped [`MonitorHandle`] counts as a stop.
    pub async fn wait_for_check(&mut self) -> Option<u64> {
        loop {
            if *self.stop_rx.borrow() {
                return None;
            }

            tokio::select! {
                // `biased` makes the stop branch win when both are ready,
                // so a teardown never produces one last spurious check.
                biased;

                changed = self.stop_rx.changed() => {
                    match changed {
                        Ok(()) => continue, // re-examine the flag
                        Err(_) => return None, // handle dropped
                    }
                }
                _ = time::sleep_until(self.next_check) => {
                    self.checks += 1;
                    self.next_check = Instant::now() + self.config.check_interval;
                    trace!(check = self.checks, "expiry check due");
                    return Some(self.checks);
                }
            }
        }
    }

    /// How many checks have fired so far.
    pub fn checks(&self) -> u64 {
        self.checks
    }

    /// The configured check interval.
    pub fn check_interval(&self) -> Duration {
        self.config.check_interval
    }
}
