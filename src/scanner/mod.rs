//! Scanner module for classpath entry discovery and indexing.
//!
//! This module provides functionality for:
//! - Classifying classpath entries (directory, archive, ignorable, unknown)
//! - Walking directory entries and enumerating jar/zip archives
//! - Filtering relative paths down to class files worth comparing
//! - Unicode path normalization of relative paths
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`filter`]: Ignore rules applied to every candidate relative path
//! - [`indexer`]: Per-entry indexing producing relative paths
//! - [`path_utils`]: Relative path normalization helpers
//!
//! # Example
//!
//! ```no_run
//! use classdupe::scanner::{ClasspathEntry, EntryIndexer, PathFilter};
//!
//! let filter = PathFilter::with_defaults();
//! let indexer = EntryIndexer::new(&filter);
//!
//! let indexed = indexer.index(&ClasspathEntry::new("libs/guava-33.0.jar")).unwrap();
//! for path in &indexed.files {
//!     println!("{} contains {}", indexed.entry, path);
//! }
//! ```

pub mod filter;
pub mod indexer;
pub mod path_utils;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

// Re-export main types
pub use filter::{PathFilter, CLASS_SUFFIX};
pub use indexer::{EntryIndexer, IndexedEntry};

/// Normalized, slash-separated path of a file inside an archive or below a
/// directory root. Two entries collide iff they produce the same value.
pub type RelativePath = String;

/// Identifier of one classpath entry, as rendered in reports.
pub type EntryId = String;

/// One filesystem location contributing to a classpath.
///
/// Either an archive file or a directory. The identifier is the path exactly
/// as it was handed to us, so reports match what the build tool printed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ClasspathEntry {
    path: PathBuf,
}

impl ClasspathEntry {
    /// Create an entry for the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the entry on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifier used as the grouping value in the classpath index.
    #[must_use]
    pub fn id(&self) -> EntryId {
        self.path.to_string_lossy().into_owned()
    }

    /// Lowercased file extension, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// Whether the file name marks a jar or zip archive.
    #[must_use]
    pub fn has_archive_name(&self) -> bool {
        matches!(self.extension().as_deref(), Some("jar" | "zip"))
    }
}

impl fmt::Display for ClasspathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl From<PathBuf> for ClasspathEntry {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for ClasspathEntry {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<&str> for ClasspathEntry {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// How an entry was treated by the indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A directory that was walked recursively.
    Directory,
    /// A jar or zip archive whose central directory was enumerated.
    Archive,
    /// A file whose extension is on the ignored list; skipped silently.
    Ignored,
    /// A file of unknown type; skipped with a warning.
    Unrecognized,
    /// The path does not exist; skipped silently.
    Missing,
}

/// Errors that abort indexing of a classpath.
///
/// Partial results are never returned alongside these: once an entry cannot
/// be read, the duplicate analysis is no longer trustworthy.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The archive could not be opened or its entries enumerated.
    #[error("Failed to open archive {path}: {source}")]
    ArchiveRead {
        /// Archive that failed
        path: PathBuf,
        /// The underlying zip error
        #[source]
        source: zip::result::ZipError,
    },

    /// An I/O error occurred while accessing an entry.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A directory entry could not be walked.
    #[error("Failed to walk directory {path}: {source}")]
    WalkDir {
        /// Directory entry being walked
        path: PathBuf,
        /// The underlying walkdir error
        #[source]
        source: walkdir::Error,
    },
}

impl ScanError {
    /// The classpath location the error is about.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::ArchiveRead { path, .. } | Self::Io { path, .. } | Self::WalkDir { path, .. } => {
                path
            }
        }
    }
}
