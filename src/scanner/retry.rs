//! Bounded retries with exponential backoff.
//!
//! Every scan unit is probed up to `max_retries` times. After failed attempt
//! `i` (0-indexed) the calling worker sleeps `base * 2^i` before moving on,
//! so with the defaults a port that never answers costs 1 + 2 + 4 seconds of
//! backoff on top of three dial timeouts.

use crate::scanner::probe::Prober;
use crate::scanner::{PortStatus, ScanOutcome};
use crate::types::ScanUnit;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default number of attempts per unit.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default backoff after the first failed attempt.
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Suspends the calling task for a backoff interval.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Retry policy wrapping a prober.
#[derive(Clone)]
pub struct RetryPolicy {
    prober: Arc<dyn Prober>,
    sleeper: Arc<dyn Sleeper>,
    max_retries: u32,
    backoff_base: Duration,
    fast_fail_refused: bool,
}

impl RetryPolicy {
    /// Create a policy with default retries and backoff.
    pub fn new(prober: Arc<dyn Prober>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            prober,
            sleeper,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
            fast_fail_refused: false,
        }
    }

    /// Set the number of attempts. Values below one are raised to one.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// Resolve a unit to closed on the first refused connection.
    pub fn with_fast_fail_refused(mut self, enabled: bool) -> Self {
        self.fast_fail_refused = enabled;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Backoff to apply after failed attempt `attempt` (0-indexed).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX))
    }

    /// Probe `unit` until it connects or the attempts run out.
    pub async fn attempt(&self, unit: &ScanUnit, dial_timeout: Duration) -> ScanOutcome {
        for attempt in 0..self.max_retries {
            match self.prober.probe(unit, dial_timeout).await {
                Ok(banner) => {
                    info!(attempts = attempt + 1, "connection to {} was successful", unit);
                    return ScanOutcome::new(unit.clone(), PortStatus::Open, attempt + 1)
                        .with_banner(banner);
                }
                Err(e) if self.fast_fail_refused && e.is_refused() => {
                    debug!(%unit, attempts = attempt + 1, "connection refused, not retrying");
                    return ScanOutcome::new(unit.clone(), PortStatus::Closed, attempt + 1);
                }
                Err(e) => {
                    let backoff = self.backoff(attempt);
                    info!(
                        error = %e,
                        "attempt {} to {} failed, waiting {:?}",
                        attempt + 1,
                        unit,
                        backoff
                    );
                    self.sleeper.sleep(backoff).await;
                }
            }
        }

        info!(%unit, attempts = self.max_retries, "failed to connect");
        ScanOutcome::new(unit.clone(), PortStatus::Closed, self.max_retries)
    }
}
