//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::banner::display_banner;
use crate::error::OutputResult;
use crate::scanner::{PortStatus, ScanReport};
use console::{style, Style};
use std::io::Write;

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Write the scan summary and port table.
///
/// Closed ports are listed only when `show_closed` is set; the counts always
/// cover every scanned port.
pub fn write_plain<W: Write>(out: &mut W, report: &ScanReport, show_closed: bool) -> OutputResult<()> {
    // Header
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(
        out,
        "                    {} Scan Results",
        style("portsweep").cyan().bold()
    )?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    writeln!(
        out,
        "  {} {}",
        style("Targets:").bold(),
        report.targets().join(", ")
    )?;
    writeln!(out)?;

    // Port table
    let rows: Vec<_> = report
        .sorted_results()
        .into_iter()
        .filter(|o| show_closed || o.is_open())
        .collect();

    if rows.is_empty() {
        writeln!(out, "  {}", style("No ports to display.").dim())?;
    } else {
        writeln!(out, "  {}", style(THIN_RULE).dim())?;
        writeln!(
            out,
            "  {:<24}  {:>6}  {:^8}  {}",
            style("TARGET").bold(),
            style("PORT").bold(),
            style("STATE").bold(),
            style("BANNER").bold()
        )?;
        writeln!(out, "  {}", style(THIN_RULE).dim())?;

        for outcome in rows {
            let status_style = match outcome.status {
                PortStatus::Open => Style::new().green().bold(),
                PortStatus::Closed => Style::new().red(),
            };

            let banner_display = outcome
                .banner
                .as_deref()
                .map(|b| truncate_string(&display_banner(b), 35))
                .unwrap_or_default();

            writeln!(
                out,
                "  {:<24}  {:>6}  {:^8}  {}",
                truncate_string(&outcome.unit.host, 24),
                outcome.unit.port,
                status_style.apply_to(outcome.status.to_string()),
                style(banner_display).dim()
            )?;
        }

        writeln!(out, "  {}", style(THIN_RULE).dim())?;
    }

    // Summary
    writeln!(out)?;
    writeln!(out, "  {}", style("Scan Summary:").bold())?;
    writeln!(
        out,
        "  Number of open ports: {}",
        style(report.open_count()).green().bold()
    )?;
    writeln!(out, "  Number of closed ports: {}", style(report.closed_count()).red())?;
    writeln!(out, "  Time taken: {:.2?}", report.duration())?;
    writeln!(out, "  Total ports scanned: {}", report.total())?;
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(targets: &[String], ports: &str, total: usize, workers: usize) {
    eprintln!();
    eprintln!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portsweep").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!(
        "{} Targets: {}",
        style("•").dim(),
        style(targets.join(", ")).white().bold()
    );
    eprintln!("{} Ports: {}", style("•").dim(), style(ports).yellow());
    eprintln!(
        "{} Scanning {} ports with {} workers...",
        style("•").dim(),
        style(total).white().bold(),
        workers
    );
    eprintln!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Truncate a string to a maximum length, adding ellipsis if truncated.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
