//! Classpath index: relative path to the set of entries containing it.
//!
//! # Overview
//!
//! The index is a multimap from [`RelativePath`] to an ordered, deduplicated
//! set of [`EntryId`]s. Both levels are `BTreeMap`/`BTreeSet`, so iteration
//! order depends only on the contents, never on the order in which classpath
//! entries were listed or finished indexing.
//!
//! Building fans out one rayon task per classpath entry. Each task produces an
//! independent [`IndexedEntry`]; the results are merged afterwards on the
//! calling thread, which is the only place the map is written.
//!
//! # Example
//!
//! ```
//! use classdupe::duplicates::ClasspathIndex;
//!
//! let mut index = ClasspathIndex::new();
//! index.insert("com/x/Foo.class", "b.jar");
//! index.insert("com/x/Foo.class", "a.jar");
//! index.insert("com/x/Foo.class", "a.jar");
//!
//! let entries: Vec<_> = index.get("com/x/Foo.class").unwrap().iter().collect();
//! assert_eq!(entries, ["a.jar", "b.jar"]);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;

use crate::scanner::{
    ClasspathEntry, EntryId, EntryIndexer, EntryKind, IndexedEntry, PathFilter, RelativePath,
    ScanError,
};

/// Counts gathered while building an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Classpath entries handed to the index
    pub entries: usize,
    /// Entries walked as directories
    pub directories: usize,
    /// Entries enumerated as archives
    pub archives: usize,
    /// Entries skipped silently (ignored extension or missing)
    pub skipped: usize,
    /// Entries skipped with a warning
    pub unrecognized: usize,
    /// Class files contributed over all entries
    pub indexed_files: usize,
}

impl IndexStats {
    fn record(&mut self, indexed: &IndexedEntry) {
        self.entries += 1;
        self.indexed_files += indexed.files.len();
        match indexed.kind {
            EntryKind::Directory => self.directories += 1,
            EntryKind::Archive => self.archives += 1,
            EntryKind::Ignored | EntryKind::Missing => self.skipped += 1,
            EntryKind::Unrecognized => self.unrecognized += 1,
        }
    }
}

/// Mapping from relative path to the entries that contain a file at that path.
///
/// No key ever maps to an empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClasspathIndex {
    files: BTreeMap<RelativePath, BTreeSet<EntryId>>,
    stats: IndexStats,
}

impl ClasspathIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every classpath entry and merge the results.
    ///
    /// Entries are indexed in parallel on the current rayon pool.
    ///
    /// # Errors
    ///
    /// Returns the [`ScanError`] of a failing entry. No partial index is
    /// returned.
    pub fn build(entries: &[ClasspathEntry], filter: &PathFilter) -> Result<Self, ScanError> {
        let indexer = EntryIndexer::new(filter);
        let indexed: Vec<IndexedEntry> = entries
            .par_iter()
            .map(|entry| indexer.index(entry))
            .collect::<Result<_, _>>()?;

        let mut index = Self::new();
        for item in &indexed {
            index.add(item);
        }

        log::debug!(
            "Indexed {} entries ({} directories, {} archives): {} class files at {} distinct paths",
            index.stats.entries,
            index.stats.directories,
            index.stats.archives,
            index.stats.indexed_files,
            index.files.len()
        );
        Ok(index)
    }

    /// Merge the output of one indexed entry.
    pub fn add(&mut self, indexed: &IndexedEntry) {
        self.stats.record(indexed);
        for (path, id) in indexed.pairs() {
            self.insert(path.as_str(), id);
        }
    }

    /// Record that `id` contains a file at `path`, creating the set on first use.
    pub fn insert(&mut self, path: impl Into<RelativePath>, id: impl Into<EntryId>) {
        self.files.entry(path.into()).or_default().insert(id.into());
    }

    /// Entries containing `path`, if any.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&BTreeSet<EntryId>> {
        self.files.get(path)
    }

    /// Iterate over all paths in order, with their contributing entries.
    pub fn iter(&self) -> impl Iterator<Item = (&RelativePath, &BTreeSet<EntryId>)> {
        self.files.iter()
    }

    /// Paths contributed by more than one entry.
    pub fn collisions(&self) -> impl Iterator<Item = (&RelativePath, &BTreeSet<EntryId>)> {
        self.files.iter().filter(|(_, ids)| ids.len() > 1)
    }

    /// Number of distinct relative paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no path was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Counts gathered while building.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        self.stats
    }
}
