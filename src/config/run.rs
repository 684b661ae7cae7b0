//! Per-run scan configuration.

use crate::config::AppSettings;
use crate::error::{ConfigError, ConfigResult};
use crate::types::PortRange;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// How final results are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Human-readable summary
    #[default]
    Text,
    /// Pretty-printed JSON record list
    Json,
    /// CSV record list
    Csv,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Configuration for one scan run. Read-only once the run starts.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Hosts to scan, in input order.
    pub targets: Vec<String>,
    pub start_port: u16,
    pub end_port: u16,
    /// Number of concurrent workers.
    pub workers: usize,
    /// Bound on each connection attempt.
    pub dial_timeout: Duration,
    pub output: OutputMode,
    /// Connection attempts per port before it is reported closed.
    pub max_retries: u32,
    /// Capacity of the task queue.
    pub queue_capacity: usize,
    /// Resolve a port to closed on the first refused connection.
    pub fast_fail_refused: bool,
}

impl RunConfig {
    /// Create a configuration for `targets` over `start_port..=end_port`
    /// with default tuning.
    pub fn new(targets: Vec<String>, start_port: u16, end_port: u16) -> Self {
        Self::from_settings(&AppSettings::default())
            .with_targets(targets)
            .with_ports(start_port, end_port)
    }

    /// Build a configuration from loaded settings.
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            targets: settings
                .targets
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            start_port: settings.start_port,
            end_port: settings.end_port,
            workers: settings.workers,
            dial_timeout: Duration::from_secs(settings.timeout_secs),
            output: settings.output,
            max_retries: settings.max_retries,
            queue_capacity: settings.queue_capacity,
            fast_fail_refused: settings.fast_fail_refused,
        }
    }

    pub fn with_targets(mut self, targets: Vec<String>) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_ports(mut self, start_port: u16, end_port: u16) -> Self {
        self.start_port = start_port;
        self.end_port = end_port;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.dial_timeout = timeout;
        self
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_fast_fail_refused(mut self, enabled: bool) -> Self {
        self.fast_fail_refused = enabled;
        self
    }

    /// Check the configuration and return the validated port range.
    pub fn validate(&self) -> ConfigResult<PortRange> {
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        let range = PortRange::from_bounds(self.start_port, self.end_port)?;
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.max_retries == 0 {
            return Err(ConfigError::NoRetries);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        Ok(range)
    }
}
