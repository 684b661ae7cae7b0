//! Target expansion.
//!
//! Turns validated targets and a port range into the ordered stream of
//! scan units: every port of the first target ascending, then the next target.

use crate::config::RunConfig;
use crate::error::ConfigResult;
use crate::types::{normalize_targets, PortRange, ScanUnit};

/// A validated, deterministic scan plan.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    targets: Vec<String>,
    range: PortRange,
}

impl ScanPlan {
    /// Validate `config` and build the plan.
    pub fn new(config: &RunConfig) -> ConfigResult<Self> {
        let range = config.validate()?;
        let targets = normalize_targets(&config.targets)?;
        Ok(Self { targets, range })
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn range(&self) -> PortRange {
        self.range
    }

    /// Number of units the plan produces.
    pub fn total(&self) -> usize {
        self.targets.len() * self.range.len()
    }

    /// Lazily yield every unit in (target, ascending port) order.
    pub fn units(&self) -> impl Iterator<Item = ScanUnit> + '_ {
        let range = self.range;
        self.targets
            .iter()
            .flat_map(move |host| range.iter().map(move |port| ScanUnit::new(host.as_str(), port)))
    }
}
