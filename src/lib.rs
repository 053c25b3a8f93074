//! classdupe - Duplicate Class Detector
//!
//! Detects class files shipped by more than one entry of a resolved
//! classpath. Archives (jar/zip) and class directories are indexed by the
//! relative path of every file they contain; paths found in several entries
//! are conflicts unless an accepted-duplicates group covers all of them.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;

use std::io;

use anyhow::Context;
use yansi::Paint;

use crate::cli::{CheckArgs, Cli, Commands, ConfigArgs, OutputFormat};
use crate::config::Config;
use crate::duplicates::{CheckOutcome, DuplicateCheck, Verdict};
use crate::error::ExitCode;
use crate::output::JsonOutput;

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error when configuration cannot be loaded or validated, when
/// no classpath phase is given, or when a classpath entry cannot be read.
/// Conflicts are not an error: they yield [`ExitCode::ConflictsFound`].
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    match cli.command {
        Commands::Check(args) => run_check(&args, cli.quiet),
        Commands::Config(args) => run_config(&args),
    }
}

fn run_config(args: &ConfigArgs) -> anyhow::Result<ExitCode> {
    let config = Config::load(args.config.as_deref())?;
    let text = config
        .to_toml()
        .context("Failed to render configuration as TOML")?;
    print!("{text}");
    Ok(ExitCode::Success)
}

fn run_check(args: &CheckArgs, quiet: bool) -> anyhow::Result<ExitCode> {
    let mut config = Config::load(args.config.as_deref())?;
    config.merge_check_args(args);
    let check_config = config.validate().context("Invalid configuration")?;

    let phases = args.classpath_phases();
    let mut check = DuplicateCheck::new(check_config);
    let outcome = check.run(&phases)?;
    let exit_code = ExitCode::from_verdict(outcome.verdict);

    match args.output {
        OutputFormat::Json => {
            JsonOutput::new(&outcome, exit_code)
                .write_to(&mut io::stdout().lock(), true)
                .context("Failed to write JSON output")?;
        }
        OutputFormat::Text => print_text(&outcome, exit_code, quiet),
    }

    Ok(exit_code)
}

fn print_text(outcome: &CheckOutcome, exit_code: ExitCode, quiet: bool) {
    let phases = outcome.phases.len();
    let conflicts = outcome.conflict_count();

    match outcome.verdict {
        Verdict::Pass => {
            if !quiet {
                println!(
                    "{} No duplicate classes in {} phase(s)",
                    "OK".green().bold(),
                    phases
                );
            }
        }
        Verdict::FailButWarn => {
            if !quiet {
                println!(
                    "{} {} duplicate class(es) found, failures ignored",
                    "WARN".yellow().bold(),
                    conflicts
                );
            }
        }
        Verdict::Fail => {
            if let Some(message) = &outcome.message {
                eprintln!("{message}");
            }
            eprintln!(
                "{} [{}] {} duplicate class(es) found",
                "FAILED".red().bold(),
                exit_code.code_prefix(),
                conflicts
            );
        }
    }
}
