//! Output formatters for check results.
//!
//! - Text reports, both the compact per-group view and the per-entry detail
//! - JSON for build tooling and scripting
//!
//! # Example
//!
//! ```no_run
//! use classdupe::duplicates::{CheckConfig, ClasspathPhase, DuplicateCheck};
//! use classdupe::error::ExitCode;
//! use classdupe::output::JsonOutput;
//!
//! let phases = [ClasspathPhase::new("main", ["libs/a.jar", "libs/b.jar"])];
//! let outcome = DuplicateCheck::new(CheckConfig::default()).run(&phases).unwrap();
//!
//! let output = JsonOutput::new(&outcome, ExitCode::from_verdict(outcome.verdict));
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod report;

pub use json::JsonOutput;
pub use report::{render_failure_message, ReportBuilder};
