//! Scan run controller.
//!
//! Validates the configuration, wires plan, retry policy, aggregator and
//! worker pool together, and hands the final state back with the elapsed time.

use crate::config::RunConfig;
use crate::error::ScanError;
use crate::scanner::aggregator::Aggregator;
use crate::scanner::plan::ScanPlan;
use crate::scanner::pool::WorkerPool;
use crate::scanner::probe::{Prober, TcpProber};
use crate::scanner::progress::ProgressObserver;
use crate::scanner::retry::{RetryPolicy, Sleeper, TokioSleeper, DEFAULT_BACKOFF_BASE};
use crate::scanner::ScanReport;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Entry point for running scans.
///
/// Holds only the injected capabilities; every call to [`Scanner::run`]
/// starts from fresh state.
pub struct Scanner {
    prober: Arc<dyn Prober>,
    sleeper: Arc<dyn Sleeper>,
    observer: Option<Arc<dyn ProgressObserver>>,
    backoff_base: Duration,
}

impl Scanner {
    /// A scanner using real TCP connections and real sleeps.
    pub fn new() -> Self {
        Self {
            prober: Arc::new(TcpProber::new()),
            sleeper: Arc::new(TokioSleeper),
            observer: None,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }

    pub fn with_prober(mut self, prober: Arc<dyn Prober>) -> Self {
        self.prober = prober;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// Scan every unit described by `config`.
    ///
    /// Fails before any connection is made if the configuration is invalid.
    pub async fn run(&self, config: &RunConfig) -> Result<ScanReport, ScanError> {
        let plan = ScanPlan::new(config)?;
        let total = plan.total();
        let start_time = Instant::now();

        info!(
            targets = plan.targets().len(),
            ports = %plan.range(),
            total,
            workers = config.workers,
            "starting scan"
        );

        let policy = Arc::new(
            RetryPolicy::new(Arc::clone(&self.prober), Arc::clone(&self.sleeper))
                .with_max_retries(config.max_retries)
                .with_backoff_base(self.backoff_base)
                .with_fast_fail_refused(config.fast_fail_refused),
        );

        let mut aggregator = Aggregator::new(total);
        if let Some(observer) = &self.observer {
            aggregator = aggregator.with_observer(Arc::clone(observer));
        }
        let aggregator = Arc::new(aggregator);

        WorkerPool::new(config.workers, config.dial_timeout)
            .with_queue_capacity(config.queue_capacity)
            .run(plan.units(), policy, Arc::clone(&aggregator))
            .await?;

        if let Some(observer) = &self.observer {
            observer.finish();
        }

        // Every worker has been joined, so this is the last reference.
        let state = match Arc::try_unwrap(aggregator) {
            Ok(aggregator) => aggregator.into_state(),
            Err(shared) => shared.snapshot().await,
        };
        let duration = start_time.elapsed();

        info!(
            open = state.open_count(),
            scanned = state.completed(),
            elapsed = ?duration,
            "scan complete"
        );

        Ok(ScanReport::new(plan.targets().to_vec(), state, duration))
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}
