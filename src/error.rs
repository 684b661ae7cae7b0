//! Error types for portsweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Only [`ConfigError`],
//! [`OutputError`] and the run-level [`ScanError`] ever reach a caller;
//! [`ProbeError`] is absorbed by the retry policy.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid run configuration. Fatal: the run never starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidPortRange(u16, u16),

    #[error("port {0} is out of valid range (1-65535)")]
    InvalidPort(u16),

    #[error("worker count must be greater than zero")]
    NoWorkers,

    #[error("no targets specified")]
    NoTargets,

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("retry count must be at least 1")]
    NoRetries,

    #[error("queue capacity must be greater than zero")]
    ZeroQueueCapacity,

    #[error("failed to read settings from {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),
}

/// A single connection attempt that did not succeed.
///
/// Variants only drive logging and the optional fast-fail policy; the result
/// model records every failure as `Closed`.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("connection timed out")]
    Timeout,

    #[error("connection refused")]
    ConnectionRefused,

    #[error("host unreachable: {0}")]
    Unreachable(String),

    #[error("name resolution failed: {0}")]
    Resolve(String),

    #[error("connection failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ProbeError {
    /// Whether the target answered conclusively that nothing listens there.
    pub fn is_refused(&self) -> bool {
        matches!(self, Self::ConnectionRefused)
    }
}

/// Rendering of final results failed.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Run-level error returned by the scan controller.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("scan worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for rendering operations.
pub type OutputResult<T> = Result<T, OutputError>;
