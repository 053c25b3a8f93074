//! Duplicate class detection.
//!
//! This module provides:
//! - The classpath index from relative path to containing entries ([`index`])
//! - Conflict resolution against accepted duplicates ([`resolver`])
//! - The per-phase check and its verdict ([`check`])

pub mod check;
pub mod index;
pub mod resolver;

pub use check::{
    check_phase, CheckConfig, CheckError, CheckOutcome, CheckState, ClasspathPhase,
    DuplicateCheck, PhaseResult, PhaseSummary, Verdict,
};
pub use index::{ClasspathIndex, IndexStats};
pub use resolver::{
    artifact_name, resolve, AcceptedDuplicates, ConflictRecord, ConflictResolver, Resolution,
};
