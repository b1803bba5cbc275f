//! Platform-specific path handling.
//!
//! Only the long-path prefix differs between platforms; everything else in
//! the crate works on paths returned by [`PathNormalizer::normalize`].

#[cfg(windows)]
pub mod windows;

#[cfg(not(windows))]
pub mod unix;

#[cfg(windows)]
pub use windows::LONG_PATH_PREFIX;

#[cfg(not(windows))]
pub use unix::LONG_PATH_PREFIX;

use std::borrow::Cow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Path length above which Windows refuses unprefixed paths.
pub const DEFAULT_PATH_LIMIT: usize = 260;

/// Rewrites paths that are too long for the platform's file APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathNormalizer {
    limit: usize,
    prefix: Option<&'static str>,
}

impl PathNormalizer {
    /// Build a normalizer with an explicit prefix. `None` disables rewriting.
    pub fn new(limit: usize, prefix: Option<&'static str>) -> Self {
        Self { limit, prefix }
    }

    /// Normalizer for the platform this binary was compiled for.
    pub fn native(limit: usize) -> Self {
        Self::new(limit, LONG_PATH_PREFIX)
    }

    /// Return `path` with the long-path prefix prepended when it is longer
    /// than the limit and not already prefixed; otherwise `path` unchanged.
    pub fn normalize<'a>(&self, path: &'a Path) -> Cow<'a, Path> {
        let Some(prefix) = self.prefix else {
            return Cow::Borrowed(path);
        };

        let raw = path.as_os_str();
        if raw.as_encoded_bytes().starts_with(prefix.as_bytes()) || raw.len() <= self.limit {
            return Cow::Borrowed(path);
        }

        let mut prefixed = OsString::with_capacity(prefix.len() + raw.len());
        prefixed.push(prefix);
        prefixed.push(raw);
        Cow::Owned(PathBuf::from(prefixed))
    }
}

impl Default for PathNormalizer {
    fn default() -> Self {
        Self::native(DEFAULT_PATH_LIMIT)
    }
}
