//! Per-entry indexing of classpath directories and archives.
//!
//! # Overview
//!
//! [`EntryIndexer::index`] turns one classpath entry into the list of relative
//! class file paths it contributes:
//!
//! - **Directory**: every regular file below the (canonicalized) root, walked
//!   in file-name order, relative to that root.
//! - **Jar/zip archive**: every non-directory entry of the central directory.
//! - **Anything else**: skipped. Files with an ignored extension are skipped
//!   silently, other existing files produce a warning, paths that do not exist
//!   are skipped silently.
//!
//! Every path goes through the [`PathFilter`] before it is kept.
//!
//! The archive handle lives only for the duration of [`EntryIndexer::index`]
//! and is dropped on every exit path, so scanning hundreds of jars never holds
//! more than one descriptor per worker.
//!
//! # Example
//!
//! ```no_run
//! use classdupe::scanner::{ClasspathEntry, EntryIndexer, EntryKind, PathFilter};
//!
//! let filter = PathFilter::with_defaults();
//! let indexed = EntryIndexer::new(&filter)
//!     .index(&ClasspathEntry::new("build/classes/java/main"))
//!     .unwrap();
//! assert_eq!(indexed.kind, EntryKind::Directory);
//! ```

use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use walkdir::WalkDir;
use zip::ZipArchive;

use super::path_utils::{normalize_archive_name, relative_path};
use super::{ClasspathEntry, EntryId, EntryKind, PathFilter, RelativePath, ScanError};

/// Relative paths contributed by one classpath entry.
#[derive(Debug, Clone)]
pub struct IndexedEntry {
    /// The entry that was indexed
    pub entry: ClasspathEntry,
    /// How the entry was treated
    pub kind: EntryKind,
    /// Filtered relative paths, sorted and deduplicated
    pub files: Vec<RelativePath>,
}

impl IndexedEntry {
    fn skipped(entry: &ClasspathEntry, kind: EntryKind) -> Self {
        Self {
            entry: entry.clone(),
            kind,
            files: Vec::new(),
        }
    }

    /// `(relative path, entry identifier)` pairs, one per contributed file.
    ///
    /// Every file of a directory or archive is attributed to the entry itself.
    pub fn pairs(&self) -> impl Iterator<Item = (&RelativePath, EntryId)> + '_ {
        let id = self.entry.id();
        self.files.iter().map(move |path| (path, id.clone()))
    }
}

/// Indexes single classpath entries against a shared [`PathFilter`].
#[derive(Debug, Clone, Copy)]
pub struct EntryIndexer<'a> {
    filter: &'a PathFilter,
}

impl<'a> EntryIndexer<'a> {
    /// Create an indexer using the given ignore rules.
    #[must_use]
    pub fn new(filter: &'a PathFilter) -> Self {
        Self { filter }
    }

    /// Index one classpath entry.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] when a directory cannot be walked or an archive
    /// cannot be opened or enumerated. The error carries the entry's path.
    pub fn index(&self, entry: &ClasspathEntry) -> Result<IndexedEntry, ScanError> {
        let path = entry.path();
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("Skipping missing classpath entry: {}", entry);
                return Ok(IndexedEntry::skipped(entry, EntryKind::Missing));
            }
            Err(source) => {
                return Err(ScanError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let (kind, mut files) = if metadata.is_dir() {
            (EntryKind::Directory, self.index_directory(path)?)
        } else if metadata.is_file() && entry.has_archive_name() {
            (EntryKind::Archive, self.index_archive(path)?)
        } else {
            let ignored = entry
                .extension()
                .is_some_and(|ext| self.filter.is_recognized_non_class_entry(&ext));
            if ignored {
                log::debug!("Skipping ignored classpath entry: {}", entry);
                return Ok(IndexedEntry::skipped(entry, EntryKind::Ignored));
            }
            log::warn!("Don't know what to do with classpath entry {}", entry);
            return Ok(IndexedEntry::skipped(entry, EntryKind::Unrecognized));
        };

        files.sort_unstable();
        files.dedup();
        log::debug!("Indexed {} class files from {}", files.len(), entry);

        Ok(IndexedEntry {
            entry: entry.clone(),
            kind,
            files,
        })
    }

    /// Walk a directory entry, yielding filtered paths relative to its root.
    fn index_directory(&self, path: &Path) -> Result<Vec<RelativePath>, ScanError> {
        let root = path.canonicalize().map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for item in WalkDir::new(&root).follow_links(true).sort_by_file_name() {
            let item = item.map_err(|source| ScanError::WalkDir {
                path: path.to_path_buf(),
                source,
            })?;

            if !item.file_type().is_file() {
                continue;
            }

            if let Some(rel) = relative_path(&root, item.path()) {
                if self.filter.should_include(&rel) {
                    files.push(rel);
                }
            }
        }
        Ok(files)
    }

    /// Enumerate the non-directory entries of a jar or zip archive.
    fn index_archive(&self, path: &Path) -> Result<Vec<RelativePath>, ScanError> {
        let archive_error = |source| ScanError::ArchiveRead {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut archive = ZipArchive::new(BufReader::new(file)).map_err(archive_error)?;

        let mut files = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let item = archive.by_index_raw(index).map_err(archive_error)?;
            if item.is_dir() {
                continue;
            }
            let rel = normalize_archive_name(item.name());
            if self.filter.should_include(&rel) {
                files.push(rel);
            }
        }
        Ok(files)
    }
}
