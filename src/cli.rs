use crate::cleaner::CleanOptions;
use crate::retry::{RetryPolicy, DEFAULT_ATTEMPTS};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// A tool to recursively remove node_modules directories.
#[derive(Parser, Debug)]
#[command(name = "clean-node-modules")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Example:\n  clean-node-modules /path/to/project")]
pub struct Cli {
    /// Directory to clean
    #[arg(value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Removal attempts per directory before falling back to partial removal
    #[arg(long, default_value_t = DEFAULT_ATTEMPTS, value_name = "N",
          value_parser = clap::value_parser!(u32).range(1..))]
    pub attempts: u32,

    /// Seconds to wait between removal attempts
    #[arg(long, default_value_t = 2, value_name = "SECS")]
    pub retry_delay: u64,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn clean_options(&self) -> CleanOptions {
        CleanOptions {
            retry: RetryPolicy::new(self.attempts, Duration::from_secs(self.retry_delay)),
            ..CleanOptions::default()
        }
    }
}
