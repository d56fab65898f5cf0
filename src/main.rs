//! lockfresh - Lockfile freshness checker CLI tool
//!
//! Exits 0 when every checked dependency is on its latest version,
//! 1 when at least one is outdated or could not be looked up, and
//! 2 when the check could not run at all.

use anyhow::Context;
use clap::Parser;
use lockfresh::checker::{CheckConfig, Checker};
use lockfresh::cli::CliArgs;
use lockfresh::output::{create_formatter, write_junit_file, OutputConfig};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Exit code when at least one check failed
const EXIT_CHECK_FAILED: u8 = 1;

/// Exit code when the check could not run
const EXIT_FATAL: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    init_logging(&args);

    if args.no_color {
        colored::control::set_override(false);
    }

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

/// Initialize tracing on stderr; RUST_LOG overrides the CLI verbosity
fn init_logging(args: &CliArgs) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let config = CheckConfig::from_cli(&args)?;
    tracing::debug!(
        path = %config.path.display(),
        registry = %config.registry_url,
        jobs = config.jobs,
        "starting lockfresh v{}",
        env!("CARGO_PKG_VERSION")
    );

    let checker = Checker::new(config)?;
    let report = checker.run().await?;

    // Create output formatter based on CLI options
    let output_config =
        OutputConfig::from_cli(args.json, args.junit, args.verbose, args.quiet, args.no_color);
    let formatter = create_formatter(output_config);

    // Output results
    let mut stdout = io::stdout().lock();
    formatter.format(&report, &mut stdout)?;
    stdout.flush()?;

    if let Some(path) = &args.junit_xml {
        write_junit_file(&report, path)
            .with_context(|| format!("failed to write JUnit report to {}", path.display()))?;
        tracing::debug!(path = %path.display(), "wrote JUnit report");
    }

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_CHECK_FAILED))
    }
}
