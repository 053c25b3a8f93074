//! Relative path normalization utilities.
//!
//! Relative paths are the grouping key of the whole analysis, so a class
//! found in a directory and the same class found inside a jar must produce
//! byte-identical strings. Two things get in the way:
//!
//! - Separators: directory walks on Windows yield `\`, archive entries always
//!   use `/`.
//! - Unicode: macOS reports file names in NFD (Decomposed) form, archive
//!   entries are usually NFC (Composed).
//!
//! Both are normalized here: `/` separators and NFC.
//!
//! # Example
//!
//! ```
//! use classdupe::scanner::path_utils::normalize_archive_name;
//!
//! assert_eq!(normalize_archive_name("com/x/Cafe\u{0301}.class"), "com/x/Café.class");
//! ```

use std::path::{Component, Path};
use unicode_normalization::UnicodeNormalization;

use super::RelativePath;

/// Normalize a string to NFC (Composed) form.
#[must_use]
pub fn normalize_path_str(s: &str) -> String {
    s.nfc().collect()
}

/// Normalize the name of an entry read from an archive's central directory.
///
/// Leading slashes are dropped so `/a/B.class` and `a/B.class` group together.
#[must_use]
pub fn normalize_archive_name(name: &str) -> RelativePath {
    normalize_path_str(name.trim_start_matches('/'))
}

/// Compute the relative path of `file` below `root`.
///
/// Returns `None` when `file` is not located below `root`, or when it *is*
/// `root`.
///
/// # Example
///
/// ```
/// use classdupe::scanner::path_utils::relative_path;
/// use std::path::Path;
///
/// let rel = relative_path(Path::new("/build/classes"), Path::new("/build/classes/com/x/Foo.class"));
/// assert_eq!(rel.as_deref(), Some("com/x/Foo.class"));
/// ```
#[must_use]
pub fn relative_path(root: &Path, file: &Path) -> Option<RelativePath> {
    let stripped = file.strip_prefix(root).ok()?;
    let parts: Vec<String> = stripped
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(normalize_path_str(&part.to_string_lossy())),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
