//! CSV output formatting.

use crate::error::OutputResult;
use crate::scanner::ScanReport;
use std::io::Write;

/// Write results in CSV format.
pub fn write_csv<W: Write>(out: &mut W, report: &ScanReport) -> OutputResult<()> {
    let mut wtr = csv::Writer::from_writer(out);

    // Write header
    wtr.write_record(["target", "port", "status", "banner"])?;

    for record in report.records() {
        let port = record.port.to_string();
        let status = record.status.to_string();
        wtr.write_record([
            record.target.as_str(),
            port.as_str(),
            status.as_str(),
            record.banner.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
