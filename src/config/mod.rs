//! Configuration management for portsweep.
//!
//! `RunConfig` describes a single scan; `AppSettings` supplies the defaults
//! for flags the operator did not pass.

mod run;
mod settings;

pub use run::{OutputMode, RunConfig};
pub use settings::{AppSettings, Paths};
