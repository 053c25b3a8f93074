//! Ignore rules applied to candidate relative paths and classpath entries.
//!
//! # Overview
//!
//! Only compiled class files take part in class-loading collisions. Resource
//! files, metadata directories and generated descriptors are routinely
//! duplicated on purpose, so everything else is dropped before indexing.
//!
//! A relative path is kept when:
//! 1. it ends with [`CLASS_SUFFIX`], and
//! 2. none of the ignore patterns matches the *whole* path.
//!
//! Patterns are compiled once, when the filter is built, and shared by every
//! indexing task.

use std::collections::BTreeSet;

use regex::Regex;

/// Suffix of compiled class files.
pub const CLASS_SUFFIX: &str = ".class";

/// Paths that are allowed to collide because they are sometimes even supposed to.
pub const DEFAULT_IGNORED_FILES: &[&str] =
    &["^module-info.class$", ".*/package-info.class$", "^META-INF/.*"];

/// Entry extensions that are skipped without a warning.
pub const DEFAULT_IGNORED_EXTENSIONS: &[&str] = &["exe", "gz", "tar"];

/// An ignore pattern that is not a valid regular expression.
#[derive(thiserror::Error, Debug)]
#[error("Invalid ignore pattern '{pattern}': {source}")]
pub struct InvalidPatternError {
    /// The pattern as configured
    pub pattern: String,
    /// The regex compilation error
    #[source]
    pub source: regex::Error,
}

/// Compiled ignore rules.
#[derive(Debug, Clone)]
pub struct PathFilter {
    /// Patterns as configured, kept for display.
    patterns: Vec<String>,
    /// Patterns anchored at both ends for full-path matching.
    compiled: Vec<Regex>,
    /// Lowercased extensions of entries skipped without a warning.
    ignored_extensions: BTreeSet<String>,
}

impl PathFilter {
    /// Compile a filter from ignore patterns and ignorable entry extensions.
    ///
    /// Each pattern must match the complete relative path to exclude it:
    /// `Foo` ignores `Foo` but not `a/Foo.class`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPatternError`] naming the first pattern that fails to
    /// compile.
    ///
    /// # Example
    ///
    /// ```
    /// use classdupe::scanner::PathFilter;
    ///
    /// let filter = PathFilter::new(&["^generated/.*"], &["exe"]).unwrap();
    /// assert!(filter.should_include("com/x/Foo.class"));
    /// assert!(!filter.should_include("generated/Foo.class"));
    /// ```
    pub fn new<P, E>(patterns: &[P], ignored_extensions: &[E]) -> Result<Self, InvalidPatternError>
    where
        P: AsRef<str>,
        E: AsRef<str>,
    {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex =
                Regex::new(&format!("^(?:{pattern})$")).map_err(|source| InvalidPatternError {
                    pattern: pattern.to_string(),
                    source,
                })?;
            compiled.push(regex);
        }

        Ok(Self {
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
            compiled,
            ignored_extensions: ignored_extensions
                .iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        })
    }

    /// Filter with the built-in ignore rules.
    #[must_use]
    pub fn with_defaults() -> Self {
        // The built-in patterns are constant and known to compile.
        Self::new(DEFAULT_IGNORED_FILES, DEFAULT_IGNORED_EXTENSIONS).unwrap_or_else(|e| {
            log::error!("Built-in ignore pattern rejected: {}", e);
            Self::permissive()
        })
    }

    fn permissive() -> Self {
        Self {
            patterns: Vec::new(),
            compiled: Vec::new(),
            ignored_extensions: BTreeSet::new(),
        }
    }

    /// Whether a relative path takes part in duplicate detection.
    #[must_use]
    pub fn should_include(&self, path: &str) -> bool {
        if !path.ends_with(CLASS_SUFFIX) {
            return false;
        }

        if let Some(idx) = self.compiled.iter().position(|re| re.is_match(path)) {
            log::trace!("Ignoring {} (matches '{}')", path, self.patterns[idx]);
            return false;
        }

        true
    }

    /// Whether an unrecognized entry with this extension is skipped silently.
    #[must_use]
    pub fn is_recognized_non_class_entry(&self, extension: &str) -> bool {
        self.ignored_extensions
            .contains(&extension.trim_start_matches('.').to_lowercase())
    }

    /// Ignore patterns as configured.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Extensions skipped without a warning.
    #[must_use]
    pub fn ignored_extensions(&self) -> &BTreeSet<String> {
        &self.ignored_extensions
    }
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::with_defaults()
    }
}
