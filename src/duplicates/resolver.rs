//! Conflict resolution against the accepted-duplicates allow-list.
//!
//! # Overview
//!
//! A path is a *candidate* collision when more than one classpath entry
//! contains it. A candidate is *suppressed* when a single accepted group
//! covers the artifact names of **all** of its entries; a group covering only
//! some of them does not help. Everything else becomes a [`ConflictRecord`].
//!
//! Artifact names are the entry's file name without its last extension, see
//! [`artifact_name`]. Matching is exact string comparison.
//!
//! # Example
//!
//! ```
//! use classdupe::duplicates::{resolve, AcceptedDuplicates, ClasspathIndex};
//!
//! let mut index = ClasspathIndex::new();
//! index.insert("Driver.class", "libs/mongo-3.6.1.jar");
//! index.insert("Driver.class", "libs/fongo-2.2.jar");
//!
//! let accepted = AcceptedDuplicates::new([["mongo-3.6.1", "fongo-2.2"]]);
//! assert!(resolve(&index, &accepted).is_empty());
//! assert_eq!(resolve(&index, &AcceptedDuplicates::default()).len(), 1);
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

use super::ClasspathIndex;
use crate::scanner::{EntryId, RelativePath};

/// Canonical artifact name of an entry identifier.
///
/// `libs/mongo-3.6.1.jar` becomes `mongo-3.6.1`, the directory
/// `build/classes` becomes `classes`. Identifiers without a file name are
/// returned unchanged.
#[must_use]
pub fn artifact_name(id: &str) -> String {
    Path::new(id)
        .file_stem()
        .map_or_else(|| id.to_string(), |stem| stem.to_string_lossy().into_owned())
}

/// Groups of artifact names that are allowed to mutually collide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AcceptedDuplicates {
    groups: Vec<BTreeSet<String>>,
}

impl AcceptedDuplicates {
    /// Build the allow-list from configured groups.
    ///
    /// Names are trimmed; blank names and groups left empty are dropped.
    pub fn new<I, G, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let groups = groups
            .into_iter()
            .map(|group| {
                group
                    .into_iter()
                    .map(|name| name.as_ref().trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect::<BTreeSet<_>>()
            })
            .filter(|group| {
                if group.is_empty() {
                    log::debug!("Dropping empty accepted-duplicates group");
                }
                !group.is_empty()
            })
            .collect();
        Self { groups }
    }

    /// Whether some group contains the artifact name of every entry.
    #[must_use]
    pub fn covers(&self, entries: &BTreeSet<EntryId>) -> bool {
        let names: Vec<String> = entries.iter().map(|id| artifact_name(id)).collect();
        self.groups
            .iter()
            .any(|group| names.iter().all(|name| group.contains(name)))
    }

    /// Configured groups.
    #[must_use]
    pub fn groups(&self) -> &[BTreeSet<String>] {
        &self.groups
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// A relative path found in two or more entries that no group accepts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ConflictRecord {
    /// Colliding relative path
    pub path: RelativePath,
    /// Entries containing the path (at least two, lexicographic)
    pub entries: BTreeSet<EntryId>,
}

/// Outcome of resolving one index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Unresolved conflicts, sorted by path
    pub conflicts: Vec<ConflictRecord>,
    /// Paths contained in more than one entry
    pub candidates: usize,
    /// Candidates suppressed by an accepted group
    pub suppressed: usize,
}

/// Applies an [`AcceptedDuplicates`] allow-list to a [`ClasspathIndex`].
#[derive(Debug, Clone, Copy)]
pub struct ConflictResolver<'a> {
    accepted: &'a AcceptedDuplicates,
}

impl<'a> ConflictResolver<'a> {
    /// Create a resolver for the given allow-list.
    #[must_use]
    pub fn new(accepted: &'a AcceptedDuplicates) -> Self {
        Self { accepted }
    }

    /// Compute unresolved conflicts with candidate/suppression counts.
    #[must_use]
    pub fn resolve(&self, index: &ClasspathIndex) -> Resolution {
        let mut resolution = Resolution::default();

        for (path, entries) in index.collisions() {
            resolution.candidates += 1;
            if self.accepted.covers(entries) {
                log::trace!("Accepted duplicate {} in {:?}", path, entries);
                resolution.suppressed += 1;
                continue;
            }
            resolution.conflicts.push(ConflictRecord {
                path: path.clone(),
                entries: entries.clone(),
            });
        }

        resolution
    }
}

/// Unresolved conflicts of `index`, sorted by relative path.
#[must_use]
pub fn resolve(index: &ClasspathIndex, accepted: &AcceptedDuplicates) -> Vec<ConflictRecord> {
    ConflictResolver::new(accepted).resolve(index).conflicts
}
