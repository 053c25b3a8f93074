//! Structured error handling and exit codes.

use serde::Serialize;

use crate::duplicates::Verdict;

/// Exit codes for the classdupe application.
///
/// - 0: Success (no conflicts, or conflicts reported as warnings)
/// - 1: General error (configuration, unreadable entry, unexpected failure)
/// - 2: Conflicts found (the check failed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: no conflicts, or failures are ignored.
    Success = 0,
    /// General error: the check could not be completed.
    GeneralError = 1,
    /// Conflicts found: the check completed and failed.
    ConflictsFound = 2,
}

impl ExitCode {
    /// Exit code for a completed check.
    #[must_use]
    pub fn from_verdict(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Pass | Verdict::FailButWarn => Self::Success,
            Verdict::Fail => Self::ConflictsFound,
        }
    }

    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "CD000",
            Self::GeneralError => "CD001",
            Self::ConflictsFound => "CD002",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "CD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
