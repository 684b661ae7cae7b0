//! Application settings and paths.
//!
//! Settings are read from `settings.json` in the XDG config directory
//! (`~/.config/portsweep` on Linux) or from an explicit `--config` path.
//! Nothing is ever written back.

use crate::config::OutputMode;
use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portsweep)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the configuration directory, if the platform has one.
    pub fn discover() -> Option<Self> {
        let project = ProjectDirs::from("org", "portsweep", "portsweep")?;
        Some(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Defaults applied when a command-line flag is not given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Comma-separated default targets.
    pub targets: String,
    pub start_port: u16,
    pub end_port: u16,
    /// Number of concurrent workers.
    pub workers: usize,
    /// Dial timeout in seconds.
    pub timeout_secs: u64,
    /// Connection attempts per port.
    pub max_retries: u32,
    /// Capacity of the task queue between producer and workers.
    pub queue_capacity: usize,
    /// Stop retrying a port as soon as the connection is refused.
    pub fast_fail_refused: bool,
    pub output: OutputMode,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            targets: "scanme.nmap.org".to_string(),
            start_port: 1,
            end_port: 1024,
            workers: 100,
            timeout_secs: 5,
            max_retries: 3,
            queue_capacity: 100,
            fast_fail_refused: false,
            output: OutputMode::Text,
        }
    }
}

impl AppSettings {
    /// Load settings from `path`, or from the default location when `None`.
    ///
    /// A missing default settings file is not an error; a missing explicit
    /// one is.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        match Paths::discover().map(|p| p.settings_file()) {
            Some(file) if file.exists() => Self::load_from(&file),
            _ => Ok(Self::default()),
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        debug!(path = %path.display(), "loaded settings");
        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }
}
