//! JSON output formatting.

use crate::error::OutputResult;
use crate::scanner::ScanReport;
use std::io::Write;

/// Write results as an indented JSON array of records.
pub fn write_json<W: Write>(out: &mut W, report: &ScanReport) -> OutputResult<()> {
    let json = serde_json::to_string_pretty(&report.records())?;
    writeln!(out, "{}", json)?;
    Ok(())
}
