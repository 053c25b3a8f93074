//! Duplicate class check orchestration.
//!
//! # Overview
//!
//! [`DuplicateCheck`] runs the pipeline once per classpath phase (typically
//! `main` and `test`):
//!
//! 1. **Index** - every entry of the phase is indexed in parallel
//!    ([`ClasspathIndex::build`])
//! 2. **Resolve** - collisions not covered by an accepted group become
//!    conflicts ([`ConflictResolver`])
//! 3. **Report** - phases with conflicts contribute a section to the final
//!    message ([`ReportBuilder`])
//!
//! and moves through `Idle -> Scanning -> Resolved(verdict)`. A fatal scan
//! error returns the check to `Idle`; no partial report is produced.
//!
//! # Example
//!
//! ```no_run
//! use classdupe::duplicates::{CheckConfig, ClasspathPhase, DuplicateCheck, Verdict};
//!
//! let phases = vec![
//!     ClasspathPhase::new("main", ["build/classes/java/main", "libs/guava-33.0.jar"]),
//!     ClasspathPhase::new("test", ["build/classes/java/test", "libs/junit-4.13.jar"]),
//! ];
//!
//! let mut check = DuplicateCheck::new(CheckConfig::default());
//! let outcome = check.run(&phases).unwrap();
//! if outcome.verdict == Verdict::Fail {
//!     eprintln!("{}", outcome.message.unwrap_or_default());
//! }
//! ```

use std::ffi::OsStr;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;

use super::{AcceptedDuplicates, ClasspathIndex, ConflictRecord, ConflictResolver};
use crate::output::report::{render_failure_message, ReportBuilder};
use crate::scanner::{ClasspathEntry, PathFilter, ScanError};

/// Validated, immutable settings for one check run.
#[derive(Debug, Clone, Default)]
pub struct CheckConfig {
    /// Compiled ignore rules
    pub filter: PathFilter,
    /// Groups of artifacts allowed to collide
    pub accepted: AcceptedDuplicates,
    /// Downgrade a failing verdict to a warning
    pub ignore_failures: bool,
    /// Indexing threads (0 uses the global rayon pool)
    pub threads: usize,
}

impl CheckConfig {
    /// Set the accepted-duplicates allow-list.
    #[must_use]
    pub fn with_accepted(mut self, accepted: AcceptedDuplicates) -> Self {
        self.accepted = accepted;
        self
    }

    /// Set the ignore rules.
    #[must_use]
    pub fn with_filter(mut self, filter: PathFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Enable or disable ignore-failures mode.
    #[must_use]
    pub fn with_ignore_failures(mut self, ignore: bool) -> Self {
        self.ignore_failures = ignore;
        self
    }

    /// Set the number of indexing threads.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
}

/// A named, resolved classpath to check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClasspathPhase {
    /// Phase name used as the report heading
    pub name: String,
    /// Entries in classpath order
    pub entries: Vec<ClasspathEntry>,
}

impl ClasspathPhase {
    /// Create a phase from a list of entries.
    pub fn new<I, E>(name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<ClasspathEntry>,
    {
        Self {
            name: name.into(),
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a phase from a classpath string using the platform separator
    /// (`:` on Unix, `;` on Windows). Empty elements are dropped.
    pub fn from_classpath(name: impl Into<String>, classpath: &OsStr) -> Self {
        let entries = std::env::split_paths(classpath)
            .filter(|path| !path.as_os_str().is_empty())
            .map(ClasspathEntry::new)
            .collect();
        Self {
            name: name.into(),
            entries,
        }
    }
}

/// Statistics for one checked phase.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PhaseSummary {
    /// Classpath entries in the phase
    pub entries: usize,
    /// Entries walked as directories
    pub directories: usize,
    /// Entries enumerated as archives
    pub archives: usize,
    /// Entries skipped silently
    pub skipped: usize,
    /// Entries skipped with a warning
    pub unrecognized: usize,
    /// Class files indexed over all entries
    pub indexed_files: usize,
    /// Paths found in more than one entry
    pub candidates: usize,
    /// Candidates suppressed by accepted groups
    pub suppressed: usize,
    /// Unresolved conflicts
    pub conflicts: usize,
    /// Time spent on the phase
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

fn serialize_millis<S: serde::Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

/// Result of checking one phase.
#[derive(Debug, Clone)]
pub struct PhaseResult {
    /// Phase name
    pub name: String,
    /// Unresolved conflicts, sorted by path
    pub conflicts: Vec<ConflictRecord>,
    /// Statistics
    pub summary: PhaseSummary,
}

impl PhaseResult {
    /// Whether the phase has unresolved conflicts.
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Section contributed to the combined report; empty without conflicts.
    #[must_use]
    pub fn report_section(&self) -> String {
        ReportBuilder::new(&self.conflicts).render_phase_section(&self.name)
    }
}

/// Final decision of a check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No conflicts in any phase.
    Pass,
    /// Conflicts found; the enclosing build should halt.
    Fail,
    /// Conflicts found, but ignore-failures mode only logs them.
    FailButWarn,
}

/// Lifecycle of a [`DuplicateCheck`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    /// Not run yet, or the last run failed fatally.
    Idle,
    /// Indexing and resolving phases.
    Scanning,
    /// Finished with a verdict.
    Resolved(Verdict),
}

/// Everything a check run produced.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// Pass/fail decision
    pub verdict: Verdict,
    /// Per-phase results, in the order the phases were given
    pub phases: Vec<PhaseResult>,
    /// Combined diagnostic; `None` when no phase had conflicts
    pub message: Option<String>,
}

impl CheckOutcome {
    /// Whether no phase had conflicts.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    /// Total conflicts over all phases.
    #[must_use]
    pub fn conflict_count(&self) -> usize {
        self.phases.iter().map(|p| p.conflicts.len()).sum()
    }

    /// Turn a failing verdict into an error carrying the report.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::ConflictsFound`] when the verdict is
    /// [`Verdict::Fail`].
    pub fn into_result(self) -> Result<Self, CheckError> {
        if self.verdict == Verdict::Fail {
            return Err(CheckError::ConflictsFound(
                self.message.unwrap_or_default(),
            ));
        }
        Ok(self)
    }
}

/// Errors that end a check run.
#[derive(thiserror::Error, Debug)]
pub enum CheckError {
    /// The check was invoked without any classpath phase.
    #[error("No classpath phase to check: supply at least one classpath")]
    NoPhases,

    /// A phase could not be indexed.
    #[error("Failed to index phase '{phase}': {source}")]
    Scan {
        /// Phase being indexed
        phase: String,
        /// The underlying scan error
        #[source]
        source: ScanError,
    },

    /// Conflicts were found and failures are not ignored.
    #[error("{0}")]
    ConflictsFound(String),
}

/// Index, resolve and report a single phase.
///
/// # Errors
///
/// Returns [`ScanError`] if any entry of the phase cannot be read.
pub fn check_phase(phase: &ClasspathPhase, config: &CheckConfig) -> Result<PhaseResult, ScanError> {
    let start = Instant::now();
    log::info!("Checking for duplicates in {}", phase.name);
    for entry in &phase.entries {
        log::debug!("    '{}'", entry);
    }

    let index = ClasspathIndex::build(&phase.entries, &config.filter)?;
    let resolution = ConflictResolver::new(&config.accepted).resolve(&index);
    let stats = index.stats();

    let summary = PhaseSummary {
        entries: stats.entries,
        directories: stats.directories,
        archives: stats.archives,
        skipped: stats.skipped,
        unrecognized: stats.unrecognized,
        indexed_files: stats.indexed_files,
        candidates: resolution.candidates,
        suppressed: resolution.suppressed,
        conflicts: resolution.conflicts.len(),
        duration: start.elapsed(),
    };

    log::debug!(
        "Phase {}: {} candidate collisions, {} accepted, {} conflicts",
        phase.name,
        summary.candidates,
        summary.suppressed,
        summary.conflicts
    );

    Ok(PhaseResult {
        name: phase.name.clone(),
        conflicts: resolution.conflicts,
        summary,
    })
}

/// Runs the duplicate class check over a set of classpath phases.
#[derive(Debug)]
pub struct DuplicateCheck {
    config: CheckConfig,
    state: CheckState,
}

impl DuplicateCheck {
    /// Create an idle check.
    #[must_use]
    pub fn new(config: CheckConfig) -> Self {
        Self {
            config,
            state: CheckState::Idle,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> CheckState {
        self.state
    }

    /// Settings used by this check.
    #[must_use]
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Check every phase and decide the verdict.
    ///
    /// Phases are independent and are checked in parallel. Conflicting phases
    /// are logged in detail at info level; with ignore-failures enabled the
    /// combined message is logged as a warning as well.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::NoPhases`] for an empty phase list and
    /// [`CheckError::Scan`] when an entry cannot be read.
    pub fn run(&mut self, phases: &[ClasspathPhase]) -> Result<CheckOutcome, CheckError> {
        if phases.is_empty() {
            return Err(CheckError::NoPhases);
        }

        self.state = CheckState::Scanning;
        let results = match self.scan_phases(phases) {
            Ok(results) => results,
            Err(e) => {
                self.state = CheckState::Idle;
                return Err(e);
            }
        };

        for result in results.iter().filter(|r| r.has_conflicts()) {
            log::info!(
                "Duplicate classes in {}:\n{}",
                result.name,
                ReportBuilder::new(&result.conflicts).render_by_entry()
            );
        }

        let sections: Vec<String> = results.iter().map(PhaseResult::report_section).collect();
        let details_hidden = !log::log_enabled!(log::Level::Info);
        let message = render_failure_message(&sections, details_hidden);

        let verdict = match (&message, self.config.ignore_failures) {
            (None, _) => Verdict::Pass,
            (Some(message), true) => {
                log::warn!("{}", message);
                Verdict::FailButWarn
            }
            (Some(_), false) => Verdict::Fail,
        };

        self.state = CheckState::Resolved(verdict);
        Ok(CheckOutcome {
            verdict,
            phases: results,
            message,
        })
    }

    fn scan_phases(&self, phases: &[ClasspathPhase]) -> Result<Vec<PhaseResult>, CheckError> {
        let scan = || {
            phases
                .par_iter()
                .map(|phase| {
                    check_phase(phase, &self.config).map_err(|source| CheckError::Scan {
                        phase: phase.name.clone(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        };

        if self.config.threads == 0 {
            return scan();
        }

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()
        {
            Ok(pool) => pool.install(scan),
            Err(e) => {
                log::warn!(
                    "Failed to create thread pool with {} threads, using global pool: {}",
                    self.config.threads,
                    e
                );
                scan()
            }
        }
    }
}
