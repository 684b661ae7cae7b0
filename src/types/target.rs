//! Target specification and scan unit types.
//!
//! Targets are plain host specifiers:
//! - IPv4 and IPv6 literals ("192.168.1.1", "::1", "[::1]")
//! - Hostnames ("scanme.nmap.org", "host.example.", "_svc.example.com"),
//!   resolved at connect time
//!
//! Multiple targets are given comma-separated and keep their input order.

use crate::error::ConfigError;
use crate::types::Port;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// One (host, port) pair to be probed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanUnit {
    pub host: String,
    pub port: Port,
}

impl ScanUnit {
    pub fn new(host: impl Into<String>, port: Port) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for ScanUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Parse a comma-separated target list.
///
/// Whitespace around each entry is trimmed and empty entries are dropped.
/// Every remaining entry must be an IP literal or a valid hostname.
pub fn parse_targets(spec: &str) -> Result<Vec<String>, ConfigError> {
    let targets: Vec<&str> = spec
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    normalize_targets(targets)
}

/// Validate and normalize an already split list of targets.
pub fn normalize_targets<I, S>(targets: I) -> Result<Vec<String>, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Vec::new();
    for target in targets {
        let target = target.as_ref().trim();
        if target.is_empty() {
            continue;
        }
        out.push(normalize_target(target)?);
    }

    if out.is_empty() {
        return Err(ConfigError::NoTargets);
    }
    Ok(out)
}

fn normalize_target(target: &str) -> Result<String, ConfigError> {
    let unbracketed = target
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .unwrap_or(target);

    if let Ok(ip) = unbracketed.parse::<IpAddr>() {
        return Ok(ip.to_string());
    }

    if is_valid_hostname(target) {
        return Ok(target.to_string());
    }

    Err(ConfigError::InvalidTarget(target.to_string()))
}

/// Check if a string is a resolvable hostname.
///
/// One trailing dot (fully qualified form) is accepted, and labels may
/// contain underscores as service and SRV-style names do.
fn is_valid_hostname(s: &str) -> bool {
    let s = s.strip_suffix('.').unwrap_or(s);
    if s.is_empty() || s.len() > 253 {
        return false;
    }

    // Each label must be 1-63 characters
    for label in s.split('.') {
        if label.is_empty() || label.len() > 63 {
            return false;
        }
        // Must not start or end with a hyphen
        if label.starts_with('-') || label.ends_with('-') {
            return false;
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return false;
        }
    }

    true
}
