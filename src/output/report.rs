//! Human-readable conflict reports.
//!
//! Two views of the same conflicts are rendered:
//!
//! - **By entry**: for each entry taking part in any conflict, every path it
//!   shares with some other entry.
//!
//!   ```text
//!       Found duplicate classes in libs/a-1.0.jar:
//!           com/x/Foo.class
//!           com/x/Bar.class
//!   ```
//!
//! - **By entry group**: one line per distinct set of colliding entries, so
//!   two jars sharing fifty classes are reported once.
//!
//!   ```text
//!       libs/a-1.0.jar, libs/a-2.0.jar
//!   ```
//!
//! Output depends only on the conflicts, which arrive sorted by path with
//! lexicographic entry sets, so identical input always renders identically.

use std::collections::{BTreeMap, BTreeSet};

use crate::duplicates::ConflictRecord;
use crate::scanner::{EntryId, RelativePath};

const ENTRY_INDENT: &str = "    ";
const PATH_INDENT: &str = "        ";

/// Renders conflicts of one classpath phase.
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder<'a> {
    conflicts: &'a [ConflictRecord],
}

impl<'a> ReportBuilder<'a> {
    /// Create a builder over conflicts sorted by path.
    #[must_use]
    pub fn new(conflicts: &'a [ConflictRecord]) -> Self {
        Self { conflicts }
    }

    /// Paths per entry, for every entry taking part in a conflict.
    #[must_use]
    pub fn paths_by_entry(&self) -> BTreeMap<&'a EntryId, BTreeSet<&'a RelativePath>> {
        let mut by_entry: BTreeMap<&EntryId, BTreeSet<&RelativePath>> = BTreeMap::new();
        for conflict in self.conflicts {
            for entry in &conflict.entries {
                by_entry.entry(entry).or_default().insert(&conflict.path);
            }
        }
        by_entry
    }

    /// Distinct colliding entry sets, in order of first appearance.
    #[must_use]
    pub fn entry_groups(&self) -> Vec<&'a BTreeSet<EntryId>> {
        let mut groups: Vec<&BTreeSet<EntryId>> = Vec::new();
        for conflict in self.conflicts {
            if !groups.contains(&&conflict.entries) {
                groups.push(&conflict.entries);
            }
        }
        groups
    }

    /// Detailed view: every conflicting path, listed under each entry.
    #[must_use]
    pub fn render_by_entry(&self) -> String {
        let mut lines = Vec::new();
        for (entry, paths) in self.paths_by_entry() {
            lines.push(format!("{ENTRY_INDENT}Found duplicate classes in {entry}:"));
            lines.extend(paths.into_iter().map(|path| format!("{PATH_INDENT}{path}")));
        }
        lines.join("\n")
    }

    /// Compact view: one line per distinct set of colliding entries.
    #[must_use]
    pub fn render_by_group(&self) -> String {
        self.entry_groups()
            .into_iter()
            .map(|group| format!("{ENTRY_INDENT}{}", join_entries(group)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Both views, compact first.
    #[must_use]
    pub fn render(&self) -> String {
        if self.conflicts.is_empty() {
            return String::new();
        }
        format!(
            "Conflicting entry groups:\n{}\n\nDuplicate classes by entry:\n{}",
            self.render_by_group(),
            self.render_by_entry()
        )
    }

    /// Section for one phase in the combined report: a blank line, the phase
    /// name, then the compact view. Empty when the phase has no conflicts.
    #[must_use]
    pub fn render_phase_section(&self, phase: &str) -> String {
        if self.conflicts.is_empty() {
            return String::new();
        }
        format!("\n\n{phase}\n{}", self.render_by_group())
    }
}

fn join_entries(entries: &BTreeSet<EntryId>) -> String {
    entries
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Combine non-empty phase sections into the final diagnostic.
///
/// Returns `None` when no phase contributed a section. `details_hidden` adds
/// a hint that the per-entry view is available at a higher verbosity.
#[must_use]
pub fn render_failure_message<S: AsRef<str>>(sections: &[S], details_hidden: bool) -> Option<String> {
    let body: String = sections.iter().map(AsRef::as_ref).collect();
    if body.is_empty() {
        return None;
    }

    let mut message = String::from("There are conflicting files in the following phases");
    if details_hidden {
        message.push_str(" (run with --verbose for details)");
    }
    message.push(':');
    message.push_str(&body);
    Some(message)
}
