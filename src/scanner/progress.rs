//! Progress reporting hooks.
//!
//! The aggregator reports every recorded outcome to an optional observer.
//! Observers run inside the aggregator's critical section, so they must be
//! quick and must not block.

use crate::scanner::{PortStatus, ScanOutcome};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// Completed-versus-total snapshot taken when an outcome is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(completed: usize, total: usize) -> Self {
        Self { completed, total }
    }

    /// Integer percentage, rounded down.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            100
        } else {
            self.completed * 100 / self.total
        }
    }
}

/// Receives a notification for every recorded outcome.
pub trait ProgressObserver: Send + Sync {
    fn on_outcome(&self, outcome: &ScanOutcome, progress: Progress);

    /// Called once after the last worker has exited.
    fn finish(&self) {}
}

/// Emits progress as log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_outcome(&self, outcome: &ScanOutcome, progress: Progress) {
        if outcome.status == PortStatus::Open {
            info!(unit = %outcome.unit, attempts = outcome.attempts, "port is open");
        }
        info!(
            "scanning port {}/{} ({}% complete)",
            progress.completed,
            progress.total,
            progress.percent()
        );
    }
}

/// Renders progress as a terminal progress bar.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(style);
        Self { bar }
    }
}

impl ProgressObserver for BarProgress {
    fn on_outcome(&self, outcome: &ScanOutcome, _progress: Progress) {
        self.bar.inc(1);
        if outcome.status == PortStatus::Open {
            self.bar.set_message(format!("Found open port: {}", outcome.unit));
        }
    }

    fn finish(&self) {
        self.bar.finish_with_message("Scan complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounds_down() {
        assert_eq!(Progress::new(1, 3).percent(), 33);
        assert_eq!(Progress::new(2, 3).percent(), 66);
        assert_eq!(Progress::new(3, 3).percent(), 100);
        assert_eq!(Progress::new(0, 0).percent(), 100);
    }

    #[test]
    fn test_bar_counts_outcomes() {
        use crate::types::{Port, ScanUnit};

        let progress = BarProgress::new(2);
        let unit = ScanUnit::new("10.0.0.1", Port::new(22).unwrap());
        progress.on_outcome(
            &ScanOutcome::new(unit, PortStatus::Open, 1),
            Progress::new(1, 2),
        );
        assert_eq!(progress.bar.position(), 1);
        progress.finish();
        assert!(progress.bar.is_finished());
    }
}
