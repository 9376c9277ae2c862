//! Resolved extraction root.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use crate::ArchiveError;
use crate::Result;
use crate::security::UnsafeReason;
use crate::security::path::resolve_entry;

/// An existing, canonical directory that extraction writes under.
///
/// Canonicalizing once up front means later containment checks compare
/// against a root with no symlinks or `..` left in it.
///
/// # Examples
///
/// ```no_run
/// use sealpack_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::prepare("/tmp/extraction")?;
/// let target = dest.resolve("project/readme.txt")?;
/// assert!(target.starts_with(dest.as_path()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Wraps an existing directory.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::Io` if the path does not exist, is not a
    /// directory, or cannot be canonicalized.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(ArchiveError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("destination directory does not exist: {}", path.display()),
            )));
        }
        if !path.is_dir() {
            return Err(ArchiveError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path is not a directory: {}", path.display()),
            )));
        }

        let canonical = path.canonicalize().map_err(|e| {
            ArchiveError::Io(io::Error::new(
                e.kind(),
                format!("failed to canonicalize path {}: {e}", path.display()),
            ))
        })?;
        Ok(Self(canonical))
    }

    /// Creates the directory (and parents) if needed, then wraps it.
    ///
    /// # Errors
    ///
    /// Same as [`DestDir::new`], plus directory creation failures.
    pub fn prepare(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        fs::create_dir_all(&path)?;
        Self::new(path)
    }

    /// Resolves an entry name to an absolute path under this root.
    ///
    /// # Errors
    ///
    /// Returns why the entry is unsafe; an entry resolving to the root
    /// itself is reported as `IsRoot`.
    pub fn resolve(&self, entry_name: &str) -> std::result::Result<PathBuf, UnsafeReason> {
        let resolved = resolve_entry(&self.0, entry_name)?;
        if resolved == self.0 {
            return Err(UnsafeReason::IsRoot);
        }
        Ok(resolved)
    }

    /// Creates `dir` and any missing ancestors below the root, one
    /// component at a time.
    ///
    /// Returns `Ok(false)` without creating anything further if an existing
    /// component is a symlink, since following it could leave the root.
    /// `dir` must already be resolved under the root.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a component exists as a non-directory or
    /// cannot be created.
    pub fn ensure_dir(&self, dir: &Path) -> io::Result<bool> {
        let relative = dir.strip_prefix(&self.0).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is outside {}", dir.display(), self.0.display()),
            )
        })?;

        let mut current = self.0.clone();
        for component in relative.components() {
            current.push(component);
            match fs::symlink_metadata(&current) {
                Ok(meta) if meta.file_type().is_symlink() => return Ok(false),
                Ok(meta) if meta.is_dir() => {}
                Ok(_) => {
                    return Err(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!("{} exists and is not a directory", current.display()),
                    ));
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => match fs::create_dir(&current) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists && current.is_dir() => {}
                    Err(e) => return Err(e),
                },
                Err(e) => return Err(e),
            }
        }
        Ok(true)
    }

    /// Returns the root path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dest_dir_valid() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path()).expect("dest should be valid");
        assert!(dest.as_path().is_absolute());
    }

    #[test]
    fn test_dest_dir_nonexistent() {
        let result = DestDir::new("/nonexistent/directory/that/does/not/exist");
        assert!(matches!(result, Err(ArchiveError::Io(_))));
    }

    #[test]
    fn test_dest_dir_not_a_directory() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let file_path = temp.path().join("file.txt");
        fs::write(&file_path, "test").expect("failed to write file");

        assert!(matches!(DestDir::new(file_path), Err(ArchiveError::Io(_))));
    }

    #[test]
    fn test_prepare_creates_missing_dirs() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let nested = temp.path().join("a").join("b");
        let dest = DestDir::prepare(&nested).expect("should create");
        assert!(nested.is_dir());
        assert_eq!(dest.as_path(), nested.canonicalize().unwrap());
    }

    #[test]
    fn test_canonicalization() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let subdir = temp.path().join("subdir");
        fs::create_dir(&subdir).expect("failed to create subdir");

        let dest = DestDir::new(subdir.join(".").join("..")).expect("should create dest dir");
        assert_eq!(dest.as_path(), temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_resolve() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path()).unwrap();

        let target = dest.resolve("proj/file.txt").unwrap();
        assert_eq!(target, dest.as_path().join("proj").join("file.txt"));

        assert_eq!(dest.resolve("../escape"), Err(UnsafeReason::EscapesRoot));
        assert_eq!(dest.resolve("./"), Err(UnsafeReason::IsRoot));
        assert_eq!(dest.resolve("a/.."), Err(UnsafeReason::IsRoot));
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path()).unwrap();
        let target = dest.resolve("a/b/c").unwrap();

        assert!(dest.ensure_dir(&target).unwrap());
        assert!(target.is_dir());
        // Idempotent.
        assert!(dest.ensure_dir(&target).unwrap());
    }

    #[test]
    fn test_ensure_dir_rejects_file_component() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path()).unwrap();
        fs::write(temp.path().join("a"), b"file").unwrap();

        let target = dest.resolve("a/b").unwrap();
        assert!(dest.ensure_dir(&target).is_err());
    }

    #[test]
    #[cfg(unix)]
    fn test_ensure_dir_stops_at_symlink() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let outside = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path()).unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("link")).unwrap();

        let target = dest.resolve("link/sub").unwrap();
        assert!(!dest.ensure_dir(&target).unwrap());
        assert!(!outside.path().join("sub").exists());
    }
}
