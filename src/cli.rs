//! Command-line interface definitions for portsweep.
//!
//! Uses `clap` derive macros for declarative argument parsing. Flags that are
//! not given fall back to the settings file, then to built-in defaults.

use crate::config::{AppSettings, OutputMode, RunConfig};
use crate::error::ConfigResult;
use crate::types::parse_targets;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// A concurrent TCP connect port scanner.
#[derive(Parser, Debug, Default)]
#[command(name = "portsweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A concurrent TCP connect port scanner", long_about = None)]
pub struct Args {
    /// Comma-separated hosts to scan [default: scanme.nmap.org]
    #[arg(long, value_name = "HOSTS")]
    pub targets: Option<String>,

    /// First port of the range [default: 1]
    #[arg(long, value_name = "PORT")]
    pub start_port: Option<u16>,

    /// Last port of the range [default: 1024]
    #[arg(long, value_name = "PORT")]
    pub end_port: Option<u16>,

    /// Number of concurrent workers [default: 100]
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Connection timeout in seconds [default: 5]
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output results in JSON format
    #[arg(long, conflicts_with = "csv")]
    pub json: bool,

    /// Output results in CSV format
    #[arg(long)]
    pub csv: bool,

    /// Connection attempts per port [default: 3]
    #[arg(short, long)]
    pub retries: Option<u32>,

    /// Capacity of the task queue [default: 100]
    #[arg(long, value_name = "N")]
    pub queue_capacity: Option<usize>,

    /// Stop retrying a port as soon as the connection is refused
    #[arg(long)]
    pub fast_fail_refused: bool,

    /// Show closed ports in text output
    #[arg(long)]
    pub show_closed: bool,

    /// Show a progress bar instead of progress log lines
    #[arg(long)]
    pub progress: bool,

    /// Verbose output (per-connection detail)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress progress and informational output
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to a JSON settings file
    #[arg(long, value_name = "PATH", env = "PORTSWEEP_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Output mode selected by flags, if any.
    pub fn output_mode(&self) -> Option<OutputMode> {
        if self.json {
            Some(OutputMode::Json)
        } else if self.csv {
            Some(OutputMode::Csv)
        } else {
            None
        }
    }

    /// Merge flags over `settings` into a run configuration.
    pub fn to_run_config(&self, settings: &AppSettings) -> ConfigResult<RunConfig> {
        let mut config = RunConfig::from_settings(settings);

        let targets = self.targets.as_deref().unwrap_or(&settings.targets);
        config.targets = parse_targets(targets)?;

        if let Some(start) = self.start_port {
            config.start_port = start;
        }
        if let Some(end) = self.end_port {
            config.end_port = end;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(secs) = self.timeout {
            config.dial_timeout = Duration::from_secs(secs);
        }
        if let Some(mode) = self.output_mode() {
            config.output = mode;
        }
        if let Some(retries) = self.retries {
            config.max_retries = retries;
        }
        if let Some(capacity) = self.queue_capacity {
            config.queue_capacity = capacity;
        }
        config.fast_fail_refused |= self.fast_fail_refused;

        config.validate()?;
        Ok(config)
    }
}
