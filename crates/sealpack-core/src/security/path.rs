//! Path containment checks for extraction.
//!
//! Both sides are made absolute and lexically normalized before comparison.
//! Symlinks are not interpreted here; `..` and absolute entry names are
//! neutralised because resolution happens before the prefix test.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use super::names::UnsafeReason;
use super::names::check_entry_name;

/// Compare case-insensitively as a fallback where the host filesystem
/// usually is.
const CASE_INSENSITIVE_FS: bool = cfg!(any(windows, target_os = "macos"));

/// Returns `true` if `candidate` resolves to `allowed_root` or below it.
///
/// Never fails: malformed input (empty, NUL bytes, unresolvable working
/// directory) is treated as unsafe.
///
/// # Examples
///
/// ```
/// use sealpack_core::security::path::validate;
/// use std::path::Path;
///
/// let root = Path::new("/srv/out");
/// assert!(validate(Path::new("/srv/out/a/b.txt"), root));
/// assert!(validate(Path::new("/srv/out"), root));
/// assert!(!validate(Path::new("/srv/out/../etc/passwd"), root));
/// assert!(!validate(Path::new("/srv/outside/file"), root));
/// ```
#[must_use]
pub fn validate(candidate: &Path, allowed_root: &Path) -> bool {
    let (Some(root), Some(candidate)) = (absolutize(allowed_root), absolutize(candidate)) else {
        return false;
    };
    is_within(&candidate, &root)
}

/// Resolves an archive entry name against the extraction root.
///
/// Screens the raw name, joins it to `root` (an absolute entry name replaces
/// the root entirely, which the containment check then rejects), normalizes
/// and checks containment.
///
/// # Errors
///
/// Returns the reason the entry is unsafe.
///
/// # Examples
///
/// ```
/// use sealpack_core::security::names::UnsafeReason;
/// use sealpack_core::security::path::resolve_entry;
/// use std::path::Path;
///
/// let root = Path::new("/srv/out");
/// let resolved = resolve_entry(root, "docs/./a.txt").unwrap();
/// assert_eq!(resolved, Path::new("/srv/out/docs/a.txt"));
///
/// assert_eq!(
///     resolve_entry(root, "../../etc/passwd"),
///     Err(UnsafeReason::EscapesRoot)
/// );
/// assert_eq!(
///     resolve_entry(root, "/etc/passwd"),
///     Err(UnsafeReason::AbsolutePath)
/// );
/// ```
pub fn resolve_entry(root: &Path, entry_name: &str) -> Result<PathBuf, UnsafeReason> {
    check_entry_name(entry_name)?;

    let root = absolutize(root).ok_or(UnsafeReason::EscapesRoot)?;
    let entry = Path::new(entry_name);
    let resolved = normalize(&root.join(entry));

    if !is_within(&resolved, &root) {
        return Err(if entry.has_root() {
            UnsafeReason::AbsolutePath
        } else {
            UnsafeReason::EscapesRoot
        });
    }

    Ok(resolved)
}

/// Makes a path absolute against the working directory and normalizes it.
fn absolutize(path: &Path) -> Option<PathBuf> {
    let raw = path.as_os_str();
    if raw.is_empty() || raw.as_encoded_bytes().contains(&0) {
        return None;
    }
    std::path::absolute(path).ok().map(|abs| normalize(&abs))
}

/// Lexically resolves `.` and `..` without touching the filesystem.
///
/// `..` at the root stays at the root, as the OS does.
fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::CurDir => {}
            Component::Normal(part) => result.push(part),
            Component::RootDir | Component::Prefix(_) => result.push(component.as_os_str()),
        }
    }

    result
}

/// Component-wise prefix test: equal to `root` or `root` plus a separator.
fn is_within(candidate: &Path, root: &Path) -> bool {
    if candidate.starts_with(root) {
        return true;
    }
    CASE_INSENSITIVE_FS && starts_with_ignore_case(candidate, root)
}

fn starts_with_ignore_case(candidate: &Path, root: &Path) -> bool {
    let mut candidate = candidate.components();
    root.components().all(|expected| {
        candidate.next().is_some_and(|actual| {
            actual
                .as_os_str()
                .to_string_lossy()
                .eq_ignore_ascii_case(&expected.as_os_str().to_string_lossy())
        })
    })
}
