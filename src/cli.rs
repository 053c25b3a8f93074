//! Command-line interface definitions for classdupe.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Global options control verbosity and color; subcommands run the check or show the
//! effective configuration.
//!
//! # Example
//!
//! ```bash
//! # Check a single classpath
//! classdupe check --classpath "build/classes:libs/guava-33.0.jar:libs/guava-32.1.jar"
//!
//! # Check main and test classpaths, accepting a known overlap
//! classdupe check --phase main=$MAIN_CP --phase test=$TEST_CP \
//!     --accept mongodb-driver-3.6.1,fongo-2.2.0-RC2
//!
//! # Show conflict details per entry
//! classdupe -v check --classpath "$CP"
//! ```

use std::ffi::OsStr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::duplicates::ClasspathPhase;

/// Detect duplicate class files across the entries of a classpath.
///
/// Two different archives or directories shipping the same class file make
/// class loading depend on classpath order. classdupe lists such collisions
/// per classpath phase and fails unless the colliding artifacts are accepted.
#[derive(Debug, Parser)]
#[command(name = "classdupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v shows conflict details, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check classpath phases for duplicate classes
    Check(CheckArgs),
    /// Print the effective configuration as TOML
    Config(ConfigArgs),
}

/// Arguments for the check subcommand.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Classpath phase to check, as NAME=CLASSPATH (can be repeated)
    ///
    /// CLASSPATH uses the platform path separator (':' on Unix, ';' on Windows).
    #[arg(long = "phase", value_name = "NAME=CLASSPATH", value_parser = parse_phase)]
    pub phases: Vec<PhaseArg>,

    /// Shorthand for --phase main=CLASSPATH
    #[arg(long, value_name = "CLASSPATH")]
    pub classpath: Option<String>,

    /// Configuration file (default: classdupe.toml if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Comma-separated artifact names allowed to collide (can be repeated)
    ///
    /// Artifact names are file names without their extension, for example
    /// `mongodb-driver-3.6.1,fongo-2.2.0-RC2`.
    #[arg(long, value_name = "A,B,...")]
    pub accept: Vec<String>,

    /// Regular expression of relative paths to ignore (can be repeated)
    ///
    /// Patterns must match the whole path, e.g. `^META-INF/.*`.
    #[arg(long = "ignore-file", value_name = "REGEX")]
    pub ignore_files: Vec<String>,

    /// Extension of classpath entries to skip silently (can be repeated)
    #[arg(long = "ignore-extension", value_name = "EXT")]
    pub ignore_extensions: Vec<String>,

    /// Report conflicts as warnings instead of failing
    #[arg(long)]
    pub ignore_failures: bool,

    /// Number of indexing threads (default: one per CPU)
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

impl CheckArgs {
    /// Phases requested on the command line, `--classpath` first.
    #[must_use]
    pub fn classpath_phases(&self) -> Vec<ClasspathPhase> {
        self.classpath
            .iter()
            .map(|classpath| ClasspathPhase::from_classpath("main", OsStr::new(classpath)))
            .chain(self.phases.iter().map(|phase| {
                ClasspathPhase::from_classpath(phase.name.as_str(), OsStr::new(&phase.classpath))
            }))
            .collect()
    }
}

/// Arguments for the config subcommand.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Configuration file (default: classdupe.toml if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// A `NAME=CLASSPATH` phase argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseArg {
    /// Phase name
    pub name: String,
    /// Unsplit classpath
    pub classpath: String,
}

/// Output format for check results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// JSON for tooling
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse a `NAME=CLASSPATH` phase argument.
///
/// The name must be non-empty; the classpath may be empty.
///
/// # Examples
///
/// ```
/// use classdupe::cli::parse_phase;
///
/// let phase = parse_phase("test=a.jar:b.jar").unwrap();
/// assert_eq!(phase.name, "test");
/// assert_eq!(phase.classpath, "a.jar:b.jar");
/// assert!(parse_phase("a.jar").is_err());
/// ```
pub fn parse_phase(s: &str) -> Result<PhaseArg, String> {
    let (name, classpath) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected NAME=CLASSPATH, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Phase name is empty in '{s}'"));
    }
    Ok(PhaseArg {
        name: name.to_string(),
        classpath: classpath.to_string(),
    })
}
