//! Shared result aggregation.
//!
//! All workers funnel their outcomes through [`Aggregator::record`]. A single
//! lock covers the whole increment-and-append sequence, so the counters and
//! the result list never disagree.

use crate::scanner::progress::{Progress, ProgressObserver};
use crate::scanner::{PortStatus, ScanOutcome};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

/// Aggregate of every outcome recorded so far.
#[derive(Debug, Clone, Default)]
pub struct AggregateState {
    open_count: usize,
    completed: usize,
    total: usize,
    results: Vec<ScanOutcome>,
}

impl AggregateState {
    fn new(total: usize) -> Self {
        Self {
            total,
            results: Vec::with_capacity(total),
            ..Self::default()
        }
    }

    pub fn open_count(&self) -> usize {
        self.open_count
    }

    pub fn closed_count(&self) -> usize {
        self.completed - self.open_count
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Outcomes in completion order.
    pub fn results(&self) -> &[ScanOutcome] {
        &self.results
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }
}

/// Thread-safe collector of scan outcomes.
pub struct Aggregator {
    state: Mutex<AggregateState>,
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl Aggregator {
    /// Create an aggregator expecting `total` outcomes.
    pub fn new(total: usize) -> Self {
        Self {
            state: Mutex::new(AggregateState::new(total)),
            observer: None,
        }
    }

    /// Notify `observer` after every recorded outcome.
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Record one finished unit and return the progress it produced.
    pub async fn record(&self, outcome: ScanOutcome) -> Progress {
        let mut state = self.state.lock().await;

        if state.completed >= state.total {
            warn!(unit = %outcome.unit, "outcome recorded beyond planned total");
        }
        state.completed += 1;
        if outcome.status == PortStatus::Open {
            state.open_count += 1;
        }

        let progress = Progress::new(state.completed, state.total);
        if let Some(observer) = &self.observer {
            observer.on_outcome(&outcome, progress);
        }
        state.results.push(outcome);

        progress
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> AggregateState {
        self.state.lock().await.clone()
    }

    /// Consume the aggregator once every worker has finished.
    pub fn into_state(self) -> AggregateState {
        self.state.into_inner()
    }
}
