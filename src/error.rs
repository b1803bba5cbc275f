use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a cleaning run as a whole.
///
/// Failures on individual paths are never returned here; they are logged
/// and collected in the [`CleanReport`](crate::cleaner::CleanReport).
#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Cannot access root directory {path}: {source}")]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type alias for cleaner error handling
pub type Result<T> = std::result::Result<T, CleanError>;
