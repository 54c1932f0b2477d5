//! Document lookup errors.

use std::io;
use std::path::PathBuf;

/// Failure categories visible to callers of the cache.
///
/// The HTTP layer maps `NotFound` to 404 and `Internal` to 500.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The source is missing or is a directory.
    NotFound,
    /// The source exists but could not be inspected or read.
    Internal,
}

/// Error returned by [`DocumentCache::get`](crate::DocumentCache::get).
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Source file does not exist.
    #[error("Source file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Source path is a directory.
    #[error("Source path is a directory: {}", .0.display())]
    Directory(PathBuf),
    /// Stat failed for a reason other than a missing file.
    #[error("Failed to stat {}: {source}", path.display())]
    Stat {
        /// Source path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Reading the file contents failed.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// Source path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl DocumentError {
    /// Classify a stat error, separating missing files from other failures.
    pub(crate) fn stat(path: impl Into<PathBuf>, err: io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Stat { path, source: err },
        }
    }

    /// Failure category for this error.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound(_) | Self::Directory(_) => FailureKind::NotFound,
            Self::Stat { .. } | Self::Read { .. } => FailureKind::Internal,
        }
    }
}
