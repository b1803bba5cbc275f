use crate::error::{CleanError, Result};
use crate::platform::{PathNormalizer, DEFAULT_PATH_LIMIT};
use crate::retry::RetryPolicy;
use std::ffi::OsStr;
use std::fmt;
use std::fs::{self, FileType};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Directory name removed by default.
pub const DEFAULT_TARGET: &str = "node_modules";

/// Tunables for a cleaning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOptions {
    /// Exact directory name that marks a subtree for removal.
    pub target_name: String,
    /// Retry policy applied to the bulk removal of each target.
    pub retry: RetryPolicy,
    /// Path length above which the long-path prefix is applied.
    pub path_limit: usize,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            target_name: DEFAULT_TARGET.to_string(),
            retry: RetryPolicy::default(),
            path_limit: DEFAULT_PATH_LIMIT,
        }
    }
}

/// Recursive removal of a single path.
pub trait Remover {
    /// Remove `path` and everything below it. A path that is already gone
    /// counts as removed.
    fn remove_all(&self, path: &Path) -> io::Result<()>;
}

/// [`Remover`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsRemover;

impl Remover for FsRemover {
    fn remove_all(&self, path: &Path) -> io::Result<()> {
        let result = match fs::symlink_metadata(path) {
            Ok(metadata) if metadata.is_dir() => fs::remove_dir_all(path),
            Ok(_) => fs::remove_file(path),
            Err(e) => Err(e),
        };

        match result {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// What the walk does with a node it has just reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    /// Keep walking; directories are entered, files are ignored.
    Descend,
    /// Remove this directory and do not enumerate its children.
    Target(PathBuf),
}

/// A removal that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRemoval {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a cleaning run
#[derive(Debug, Clone, Default)]
pub struct CleanReport {
    /// Targets removed in full.
    pub removed: Vec<PathBuf>,
    /// Targets still present after every retry.
    pub failed: Vec<FailedRemoval>,
    /// Children of failed targets that the partial removal could not delete.
    pub leftovers: Vec<FailedRemoval>,
    /// Paths that could not be accessed during the walk.
    pub skipped: Vec<PathBuf>,
}

impl CleanReport {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.failed.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn display_status(&self) -> String {
        let mut status = vec![format!("Directories removed: {}", self.removed.len())];

        if self.has_failures() {
            status.push(format!("Directories not removed: {}", self.failed.len()));
        }
        if !self.leftovers.is_empty() {
            status.push(format!("Entries left behind: {}", self.leftovers.len()));
        }
        if !self.skipped.is_empty() {
            status.push(format!("Paths skipped: {}", self.skipped.len()));
        }

        status.join("\n")
    }
}

/// Walks a tree and removes every directory named [`CleanOptions::target_name`].
pub struct Cleaner<R = FsRemover> {
    options: CleanOptions,
    normalizer: PathNormalizer,
    remover: R,
}

impl Cleaner<FsRemover> {
    pub fn new(options: CleanOptions) -> Self {
        Self::with_remover(options, FsRemover)
    }
}

impl<R: Remover> Cleaner<R> {
    pub fn with_remover(options: CleanOptions, remover: R) -> Self {
        let normalizer = PathNormalizer::native(options.path_limit);
        Self {
            options,
            normalizer,
            remover,
        }
    }

    /// Replace the platform normalizer.
    pub fn with_normalizer(mut self, normalizer: PathNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn remover(&self) -> &R {
        &self.remover
    }

    /// Walk `root` depth-first and remove every target found.
    ///
    /// Only a root that cannot be accessed, or a walk error that carries no
    /// path, is returned as an error. Every per-path failure is logged and
    /// recorded in the report instead.
    pub fn run(&self, root: &Path) -> Result<CleanReport> {
        fs::symlink_metadata(self.normalizer.normalize(root)).map_err(|source| {
            CleanError::RootUnavailable {
                path: root.to_path_buf(),
                source,
            }
        })?;

        let mut report = CleanReport::default();
        let mut walker = WalkDir::new(root).follow_links(false).into_iter();

        while let Some(item) = walker.next() {
            match item {
                Ok(entry) => {
                    if let Visit::Target(path) = self.classify(entry.path(), entry.file_type()) {
                        // Release the handle walkdir holds on the target before deleting it.
                        walker.skip_current_dir();
                        self.remove_target(&path, &mut report);
                    }
                }
                Err(err) => {
                    if let Visit::Target(path) = self.recover(err, &mut report)? {
                        self.remove_target(&path, &mut report);
                    }
                }
            }
        }

        Ok(report)
    }

    fn classify(&self, path: &Path, file_type: FileType) -> Visit {
        if file_type.is_dir() && path.file_name() == Some(OsStr::new(&self.options.target_name)) {
            Visit::Target(path.to_path_buf())
        } else {
            Visit::Descend
        }
    }

    fn recover(&self, err: walkdir::Error, report: &mut CleanReport) -> Result<Visit> {
        let Some(path) = err.path().map(Path::to_path_buf) else {
            return Err(CleanError::Walk(err));
        };

        let kind = err.io_error().map(io::Error::kind);
        Ok(self.resolve_inaccessible(path, kind, &err, report))
    }

    /// Decide what to do with a path the walk could not access. A path that
    /// still exists under its normalized form replaces the original and is
    /// classified again.
    fn resolve_inaccessible(
        &self,
        path: PathBuf,
        kind: Option<io::ErrorKind>,
        cause: &dyn fmt::Display,
        report: &mut CleanReport,
    ) -> Visit {
        if kind == Some(io::ErrorKind::NotFound) {
            debug!("Path vanished during walk: {}", path.display());
            return Visit::Descend;
        }

        let normalized = self.normalizer.normalize(&path);
        match fs::symlink_metadata(&normalized) {
            Ok(metadata) => match self.classify(&normalized, metadata.file_type()) {
                Visit::Target(target) => Visit::Target(target),
                Visit::Descend => {
                    debug!("Cannot read {}: {}", path.display(), cause);
                    report.skipped.push(path);
                    Visit::Descend
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Path vanished during walk: {}", path.display());
                Visit::Descend
            }
            Err(_) => {
                warn!("Cannot access path {}: {}", path.display(), cause);
                report.skipped.push(path);
                Visit::Descend
            }
        }
    }

    fn remove_target(&self, path: &Path, report: &mut CleanReport) {
        info!("Attempting to remove: {}", path.display());

        let result = self
            .options
            .retry
            .run(|| self.remover.remove_all(&self.normalizer.normalize(path)));

        match result {
            Ok(()) => {
                info!("Successfully removed: {}", path.display());
                report.removed.push(path.to_path_buf());
            }
            Err(e) => {
                error!("Failed to remove {}: {}", path.display(), e);
                report.failed.push(FailedRemoval {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                });
                self.remove_children(path, report);
            }
        }
    }

    /// Best-effort sweep over the direct children of a target whose bulk
    /// removal failed. Each child gets one attempt.
    fn remove_children(&self, path: &Path, report: &mut CleanReport) {
        let entries = match fs::read_dir(self.normalizer.normalize(path)) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot list {} for partial removal: {}", path.display(), e);
                return;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Cannot read entry in {}: {}", path.display(), e);
                    continue;
                }
            };

            let child = path.join(entry.file_name());
            match self.remover.remove_all(&self.normalizer.normalize(&child)) {
                Ok(()) => debug!("Removed {}", child.display()),
                Err(e) => {
                    error!("Failed to remove {}: {}", child.display(), e);
                    report.leftovers.push(FailedRemoval {
                        path: child,
                        error: e.to_string(),
                    });
                }
            }
        }
    }
}
