//! Output formatting module.
//!
//! Provides formatters for plain text, JSON, and CSV output of scan results.
//! Rendering reads the finished report only; a failure here never touches
//! the collected results.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use plain::{print_error, print_scan_header, write_plain};

use crate::config::OutputMode;
use crate::error::OutputResult;
use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Render `report` in `mode` to `out`.
pub fn write_results<W: Write>(
    out: &mut W,
    report: &ScanReport,
    mode: OutputMode,
    show_closed: bool,
) -> OutputResult<()> {
    match mode {
        OutputMode::Text => write_plain(out, report, show_closed),
        OutputMode::Json => write_json(out, report),
        OutputMode::Csv => write_csv(out, report),
    }
}

/// Render `report` to stdout.
pub fn print_results(report: &ScanReport, mode: OutputMode, show_closed: bool) -> OutputResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_results(&mut out, report, mode, show_closed)?;
    out.flush()?;
    Ok(())
}
