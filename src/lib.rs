//! # portsweep - A Concurrent TCP Connect Port Scanner
//!
//! portsweep determines which ports on one or more hosts accept TCP
//! connections, captures whatever banner a service sends first, and reports
//! per-port results with live progress.
//!
//! ## Features
//!
//! - **Full TCP connect scanning**: no elevated privileges required
//! - **Bounded worker pool**: a fixed number of workers drain a bounded queue
//! - **Retries with backoff**: every port gets several attempts, 1s/2s/4s apart
//! - **Banner capture**: up to 1024 bytes read within two seconds of connecting
//! - **Multiple output formats**: plain text, JSON, and CSV
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portsweep::config::RunConfig;
//! use portsweep::scanner::Scanner;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = RunConfig::new(vec!["127.0.0.1".to_string()], 20, 25).with_workers(4);
//!     let report = Scanner::new().run(&config).await.unwrap();
//!
//!     println!("{} of {} ports open", report.open_count(), report.total());
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Validated ports and scan units
//! - [`scanner`] - Plan, prober, retry policy, worker pool, aggregator, runner
//! - [`config`] - Run configuration and settings file
//! - [`error`] - Error types
//! - [`output`] - Output formatting utilities
//!
//! ## Known limits
//!
//! A port that never answers costs `retries * timeout` plus 7 seconds of
//! backoff, so a worst-case run takes roughly
//! `ceil(total / workers) * (retries * timeout + 7s)`. Large ranges with few
//! workers can take a very long time.

pub mod banner;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use config::{OutputMode, RunConfig};
pub use error::{ConfigError, OutputError, ProbeError, ScanError};
pub use scanner::{PortStatus, ScanOutcome, ScanRecord, ScanReport, Scanner};
pub use types::{Port, PortRange, ScanUnit};
