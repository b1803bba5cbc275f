//! clean-node-modules - recursively remove `node_modules` directories
//!
//! This library walks a directory tree and deletes every `node_modules`
//! directory it finds, retrying locked directories and falling back to a
//! partial removal when a directory cannot be deleted as a whole.

pub mod cleaner;
pub mod cli;
pub mod error;
pub mod platform;
pub mod retry;

pub use cleaner::{CleanOptions, CleanReport, Cleaner, FailedRemoval, FsRemover, Remover, Visit};
pub use error::{CleanError, Result};
pub use platform::PathNormalizer;
pub use retry::RetryPolicy;
