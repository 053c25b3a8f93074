//! JSON output formatter for check results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "verdict": "fail",
//!   "phases": [
//!     {
//!       "name": "main",
//!       "conflicts": [
//!         { "path": "com/x/Foo.class", "entries": ["libs/a-1.0.jar", "libs/a-2.0.jar"] }
//!       ],
//!       "summary": {
//!         "entries": 12,
//!         "directories": 1,
//!         "archives": 10,
//!         "skipped": 1,
//!         "unrecognized": 0,
//!         "indexed_files": 5310,
//!         "candidates": 3,
//!         "suppressed": 2,
//!         "conflicts": 1,
//!         "duration_ms": 84
//!       }
//!     }
//!   ],
//!   "message": "There are conflicting files in the following phases: ...",
//!   "summary": {
//!     "phases": 1,
//!     "conflicting_phases": 1,
//!     "conflicts": 1,
//!     "exit_code": 2,
//!     "exit_code_name": "CD002"
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{CheckOutcome, ConflictRecord, PhaseResult, PhaseSummary, Verdict};
use crate::error::ExitCode;

/// A single checked phase in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonPhase {
    /// Phase name
    pub name: String,
    /// Unresolved conflicts, sorted by path
    pub conflicts: Vec<ConflictRecord>,
    /// Phase statistics
    pub summary: PhaseSummary,
}

impl JsonPhase {
    /// Create a JSON phase from a phase result.
    #[must_use]
    pub fn from_phase_result(result: &PhaseResult) -> Self {
        Self {
            name: result.name.clone(),
            conflicts: result.conflicts.clone(),
            summary: result.summary.clone(),
        }
    }
}

/// Totals over all phases.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Number of phases checked
    pub phases: usize,
    /// Number of phases with at least one conflict
    pub conflicting_phases: usize,
    /// Conflicts over all phases
    pub conflicts: usize,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "CD002")
    pub exit_code_name: String,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Final decision
    pub verdict: Verdict,
    /// Per-phase results
    pub phases: Vec<JsonPhase>,
    /// Combined text report, absent when nothing conflicts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Totals
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create JSON output from a check outcome and the exit code of the run.
    #[must_use]
    pub fn new(outcome: &CheckOutcome, exit_code: ExitCode) -> Self {
        Self {
            verdict: outcome.verdict,
            phases: outcome
                .phases
                .iter()
                .map(JsonPhase::from_phase_result)
                .collect(),
            message: outcome.message.clone(),
            summary: JsonSummary {
                phases: outcome.phases.len(),
                conflicting_phases: outcome.phases.iter().filter(|p| p.has_conflicts()).count(),
                conflicts: outcome.conflict_count(),
                exit_code: exit_code.as_i32(),
                exit_code_name: exit_code.code_prefix().to_string(),
            },
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
