//! Scanner module - the concurrent scanning engine.
//!
//! Data flows leaf-first through the submodules:
//!
//! - [`plan`] expands targets and a port range into ordered scan units
//! - [`probe`] makes one TCP connect attempt and grabs a banner
//! - [`retry`] wraps the prober with bounded retries and backoff
//! - [`pool`] runs a fixed set of workers over a bounded queue
//! - [`aggregator`] collects outcomes under a single lock
//! - [`runner`] drives a whole run and produces a [`ScanReport`]

pub mod aggregator;
pub mod plan;
pub mod pool;
pub mod probe;
pub mod progress;
pub mod retry;
pub mod runner;

use crate::types::ScanUnit;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

pub use aggregator::{AggregateState, Aggregator};
pub use plan::ScanPlan;
pub use pool::WorkerPool;
pub use probe::{Prober, TcpProber};
pub use progress::{BarProgress, LogProgress, Progress, ProgressObserver};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
pub use runner::Scanner;

/// Status of a scanned port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    /// A connection was accepted
    Open,
    /// Every attempt failed, whatever the cause
    Closed,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Final verdict for one scan unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub unit: ScanUnit,
    pub status: PortStatus,
    /// Banner captured from the service (if any).
    pub banner: Option<String>,
    /// Number of probe calls made, at least one.
    pub attempts: u32,
}

impl ScanOutcome {
    pub fn new(unit: ScanUnit, status: PortStatus, attempts: u32) -> Self {
        Self {
            unit,
            status,
            banner: None,
            attempts,
        }
    }

    /// Set the banner.
    pub fn with_banner(mut self, banner: Option<String>) -> Self {
        self.banner = banner;
        self
    }

    pub fn is_open(&self) -> bool {
        self.status == PortStatus::Open
    }
}

/// One row of machine-readable output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub target: String,
    pub port: u16,
    pub status: PortStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

impl From<&ScanOutcome> for ScanRecord {
    fn from(outcome: &ScanOutcome) -> Self {
        Self {
            target: outcome.unit.host.clone(),
            port: outcome.unit.port.as_u16(),
            status: outcome.status,
            banner: outcome.banner.clone(),
        }
    }
}

/// Everything a renderer needs once a run has finished.
#[derive(Debug, Clone)]
pub struct ScanReport {
    targets: Vec<String>,
    state: AggregateState,
    duration: Duration,
}

impl ScanReport {
    pub fn new(targets: Vec<String>, state: AggregateState, duration: Duration) -> Self {
        Self {
            targets,
            state,
            duration,
        }
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn state(&self) -> &AggregateState {
        &self.state
    }

    pub fn open_count(&self) -> usize {
        self.state.open_count()
    }

    pub fn closed_count(&self) -> usize {
        self.state.closed_count()
    }

    /// Number of (host, port) pairs scanned.
    pub fn total(&self) -> usize {
        self.state.total()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Outcomes ordered by target input order, then ascending port.
    pub fn sorted_results(&self) -> Vec<&ScanOutcome> {
        let rank: HashMap<&str, usize> = self
            .targets
            .iter()
            .enumerate()
            .rev()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let mut results: Vec<&ScanOutcome> = self.state.results().iter().collect();
        results.sort_by_key(|o| {
            (
                rank.get(o.unit.host.as_str()).copied().unwrap_or(usize::MAX),
                o.unit.port,
            )
        });
        results
    }

    /// Machine-readable rows in report order.
    pub fn records(&self) -> Vec<ScanRecord> {
        self.sorted_results().into_iter().map(ScanRecord::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;

    #[test]
    fn test_port_status_display() {
        assert_eq!(PortStatus::Open.to_string(), "open");
        assert_eq!(PortStatus::Closed.to_string(), "closed");
    }

    #[test]
    fn test_record_omits_missing_banner() {
        let unit = ScanUnit::new("127.0.0.1", Port::new(80).unwrap());
        let closed = ScanRecord::from(&ScanOutcome::new(unit.clone(), PortStatus::Closed, 3));
        let json = serde_json::to_value(&closed).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"target": "127.0.0.1", "port": 80, "status": "closed"})
        );

        let open = ScanOutcome::new(unit, PortStatus::Open, 1).with_banner(Some("ready".into()));
        let json = serde_json::to_value(ScanRecord::from(&open)).unwrap();
        assert_eq!(json["banner"], "ready");
        assert_eq!(json["status"], "open");
    }
}
