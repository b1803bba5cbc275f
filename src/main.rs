use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use clean_node_modules::cli::Cli;
use clean_node_modules::{CleanReport, Cleaner};
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // Nothing left to report to if stderr is gone.
            e.print().ok();
            return ExitCode::FAILURE;
        }
    };

    init_logging(cli.verbose, cli.quiet);

    let Some(dir) = cli.directory.as_deref() else {
        println!("Error: Please provide a directory path to clean");
        println!("Run with -h or --help for usage information");
        return ExitCode::FAILURE;
    };

    match run(&cli, dir) {
        Ok(report) => {
            for line in report.display_status().lines() {
                info!("{}", line);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error during cleanup: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, dir: &Path) -> Result<CleanReport> {
    info!("Cleaning all 'node_modules' folders in: {}", dir.display());

    Cleaner::new(cli.clean_options())
        .run(dir)
        .with_context(|| format!("cleaning {}", dir.display()))
}

fn init_logging(verbosity: u8, quiet: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if quiet {
        "warn"
    } else {
        match verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("clean_node_modules={}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
