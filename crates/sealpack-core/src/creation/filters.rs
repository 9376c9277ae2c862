//! Source filtering and archive naming for creation.

use std::path::Component;
use std::path::Path;

use crate::ArchiveError;
use crate::Result;
use crate::creation::config::CreateOptions;

/// Checks if a path relative to the source root should be left out.
///
/// A path is skipped if:
/// - Its own name starts with `.` and `include_hidden` is false
/// - Any component matches an exclusion pattern
///
/// # Examples
///
/// ```
/// use sealpack_core::CreateOptions;
/// use sealpack_core::creation::filters;
/// use std::path::Path;
///
/// let options = CreateOptions::default().with_include_hidden(false);
/// assert!(filters::should_skip(Path::new(".gitignore"), &options));
/// assert!(!filters::should_skip(Path::new("main.rs"), &options));
/// ```
#[must_use]
pub fn should_skip(relative: &Path, options: &CreateOptions) -> bool {
    if !options.include_hidden && is_hidden(relative) {
        return true;
    }

    options
        .exclude_patterns
        .iter()
        .any(|pattern| matches_pattern(relative, pattern))
}

/// Checks if a path's final component starts with `.`.
///
/// # Examples
///
/// ```
/// use sealpack_core::creation::filters;
/// use std::path::Path;
///
/// assert!(filters::is_hidden(Path::new("dir/.hidden")));
/// assert!(!filters::is_hidden(Path::new(".hidden/visible.txt")));
/// ```
#[must_use]
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Matches any path component against a glob-lite pattern.
///
/// Supports:
/// - Exact match: `".git"` matches only `.git`
/// - Extension wildcard: `"*.txt"` matches names ending with `.txt`
/// - Prefix wildcard: `"temp*"` matches names starting with `temp`
///
/// # Examples
///
/// ```
/// use sealpack_core::creation::filters;
/// use std::path::Path;
///
/// assert!(filters::matches_pattern(Path::new("dir/.git/config"), ".git"));
/// assert!(filters::matches_pattern(Path::new("dir/test.tmp"), "*.tmp"));
/// assert!(!filters::matches_pattern(Path::new("file_temp"), "temp*"));
/// ```
#[must_use]
pub fn matches_pattern(path: &Path, pattern: &str) -> bool {
    path.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|name| pattern_matches(name, pattern))
    })
}

fn pattern_matches(s: &str, pattern: &str) -> bool {
    if pattern == s {
        return true;
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        return s.starts_with(prefix);
    }
    if let Some(suffix) = pattern.strip_prefix('*') {
        return s.ends_with(suffix);
    }
    false
}

/// Builds the stored entry name: `top` followed by `relative`, joined with
/// `/` on every platform.
///
/// # Errors
///
/// Returns `ArchiveError::Validation` if a component is not valid UTF-8 or
/// `relative` contains anything other than plain names.
///
/// # Examples
///
/// ```
/// use sealpack_core::creation::filters;
/// use std::path::Path;
///
/// let name = filters::archive_name("project", Path::new("src/main.rs")).unwrap();
/// assert_eq!(name, "project/src/main.rs");
/// ```
pub fn archive_name(top: &str, relative: &Path) -> Result<String> {
    let mut name = top.to_string();
    for component in relative.components() {
        let Component::Normal(part) = component else {
            return Err(ArchiveError::validation(format!(
                "unexpected component in source path: {}",
                relative.display()
            )));
        };
        let part = part.to_str().ok_or_else(|| {
            ArchiveError::validation(format!("path is not valid UTF-8: {}", relative.display()))
        })?;
        name.push('/');
        name.push_str(part);
    }
    Ok(name)
}
