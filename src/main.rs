use anyhow::Context;
use clap::Parser;
use portsweep::cli::Args;
use portsweep::config::{AppSettings, OutputMode};
use portsweep::output;
use portsweep::scanner::{BarProgress, LogProgress, ScanPlan, Scanner};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let settings = AppSettings::load(args.config.as_deref()).context("failed to load settings")?;
    let config = args
        .to_run_config(&settings)
        .context("invalid scan configuration")?;
    let plan = ScanPlan::new(&config)?;

    if !args.quiet && config.output == OutputMode::Text {
        output::print_scan_header(
            plan.targets(),
            &plan.range().to_string(),
            plan.total(),
            config.workers,
        );
    }

    let mut scanner = Scanner::new();
    if args.progress && !args.quiet {
        scanner = scanner.with_observer(Arc::new(BarProgress::new(plan.total())));
    } else if !args.quiet {
        scanner = scanner.with_observer(Arc::new(LogProgress));
    }

    let report = scanner.run(&config).await?;

    output::print_results(&report, config.output, args.show_closed)
        .context("failed to render results")?;

    Ok(())
}

fn init_tracing(args: &Args) {
    let level = if args.quiet {
        "warn"
    } else if args.verbose {
        "debug"
    } else if args.progress {
        // the bar replaces progress lines
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
