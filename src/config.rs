//! Application configuration management.
//!
//! Configuration is layered with figment, lowest priority first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. TOML file (`--config PATH`, else `classdupe.toml` in the working directory)
//! 3. Environment variables prefixed with `CLASSDUPE_` (`__` separates nested keys)
//! 4. Command-line flags ([`Config::merge_check_args`])
//!
//! The raw [`Config`] is then validated once into an immutable [`CheckConfig`]
//! with compiled ignore rules. Nothing is mutated while a check runs.
//!
//! # Example file
//!
//! ```toml
//! accepted_duplicates = [["mongodb-driver-3.6.1", "fongo-2.2.0-RC2"]]
//! ignored_files = ["^module-info.class$", ".*/package-info.class$", "^META-INF/.*"]
//! ignored_extensions = ["exe", "gz", "tar"]
//! ignore_failures = false
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::CheckArgs;
use crate::duplicates::{AcceptedDuplicates, CheckConfig};
use crate::scanner::filter::{
    InvalidPatternError, PathFilter, DEFAULT_IGNORED_EXTENSIONS, DEFAULT_IGNORED_FILES,
};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "classdupe.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "CLASSDUPE_";

/// Errors raised while loading or validating configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A layer could not be read or did not match the schema.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// The explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// An ignore pattern failed to compile.
    #[error(transparent)]
    InvalidPattern(#[from] InvalidPatternError),
}

/// Raw, user-facing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Groups of artifact names allowed to mutually collide.
    pub accepted_duplicates: Vec<Vec<String>>,

    /// Regular expressions matched against full relative paths; matches are
    /// never indexed.
    pub ignored_files: Vec<String>,

    /// Extensions of classpath entries skipped without a warning.
    pub ignored_extensions: BTreeSet<String>,

    /// Log conflicts instead of failing.
    pub ignore_failures: bool,

    /// Indexing threads (0 uses the global rayon pool).
    pub threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accepted_duplicates: Vec::new(),
            ignored_files: DEFAULT_IGNORED_FILES.iter().map(|s| s.to_string()).collect(),
            ignored_extensions: DEFAULT_IGNORED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ignore_failures: false,
            threads: 0,
        }
    }
}

impl Config {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// With `path == None`, [`DEFAULT_CONFIG_FILE`] is used if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] for a missing explicit file and
    /// [`ConfigError::Load`] for malformed layers.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        };

        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = &file {
            log::debug!("Loading configuration from {}", file.display());
            figment = figment.merge(Toml::file(file));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Apply command-line overrides.
    ///
    /// List options are appended to the configured lists; flags only ever
    /// switch behavior on.
    pub fn merge_check_args(&mut self, args: &CheckArgs) {
        for group in &args.accept {
            self.accepted_duplicates.push(
                group
                    .split(',')
                    .map(|name| name.trim().to_string())
                    .collect(),
            );
        }
        self.ignored_files.extend(args.ignore_files.iter().cloned());
        self.ignored_extensions.extend(
            args.ignore_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string()),
        );
        if args.ignore_failures {
            self.ignore_failures = true;
        }
        if let Some(threads) = args.threads {
            self.threads = threads;
        }
    }

    /// Compile and freeze the configuration for a check run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] for the first ignore pattern
    /// that is not a valid regular expression.
    pub fn validate(&self) -> Result<CheckConfig, ConfigError> {
        let extensions: Vec<&String> = self.ignored_extensions.iter().collect();
        let filter = PathFilter::new(self.ignored_files.as_slice(), extensions.as_slice())?;

        Ok(CheckConfig {
            filter,
            accepted: AcceptedDuplicates::new(&self.accepted_duplicates),
            ignore_failures: self.ignore_failures,
            threads: self.threads,
        })
    }

    /// Render the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
