//! Source tree traversal.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::ArchiveError;
use crate::Result;
use crate::creation::config::CreateOptions;
use crate::creation::filters;
use crate::security::check_entry_name;
use crate::types::EntryKind;

/// A file or directory selected for the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Path on disk.
    pub path: PathBuf,
    /// Name stored in the archive, `/`-separated.
    pub archive_name: String,
    /// File or directory.
    pub kind: EntryKind,
    /// Size in bytes (0 for directories).
    pub size: u64,
}

/// Result of walking a source.
#[derive(Debug, Default)]
pub struct SourceTree {
    /// Entries in traversal order; parents precede children.
    pub entries: Vec<SourceEntry>,
    /// Non-fatal notes such as skipped symlinks or unsafe names.
    pub warnings: Vec<String>,
}

/// Collects the entries for `source` in a single traversal.
///
/// A single file becomes one entry named after the file. A directory
/// contributes every descendant, each prefixed by the directory's own name
/// so the archive extracts into a folder. `exclude` (normally the output
/// archive) is never collected.
///
/// Names the extractor would refuse (reserved characters or device names,
/// trailing dots) are left out with a warning; a refused directory drops its
/// whole subtree.
///
/// # Errors
///
/// Returns `NotFound` if `source` does not exist, `Io` if traversal fails,
/// and `Validation` for names that cannot be stored, including a source whose
/// own name the extractor would refuse.
///
/// # Examples
///
/// ```no_run
/// use sealpack_core::CreateOptions;
/// use sealpack_core::creation::walker::collect_entries;
/// use std::path::Path;
///
/// let tree = collect_entries(Path::new("./project"), &CreateOptions::default(), None)?;
/// println!("{} entries", tree.entries.len());
/// # Ok::<(), sealpack_core::ArchiveError>(())
/// ```
pub fn collect_entries(
    source: &Path,
    options: &CreateOptions,
    exclude: Option<&Path>,
) -> Result<SourceTree> {
    let metadata = fs::metadata(source).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ArchiveError::NotFound {
            path: source.to_path_buf(),
        },
        _ => ArchiveError::Io(e),
    })?;

    let root = source.canonicalize()?;
    let top = root
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            ArchiveError::validation(format!(
                "cannot determine a UTF-8 archive name for {}",
                source.display()
            ))
        })?
        .to_string();

    if let Err(reason) = check_entry_name(&top) {
        return Err(ArchiveError::validation(format!(
            "source name {top:?} cannot be extracted safely: {reason}"
        )));
    }

    let mut tree = SourceTree::default();

    if !metadata.is_dir() {
        if exclude == Some(root.as_path()) {
            return Err(ArchiveError::validation(
                "source file and output archive are the same file",
            ));
        }
        tree.entries.push(SourceEntry {
            path: root,
            archive_name: top,
            kind: EntryKind::File,
            size: metadata.len(),
        });
        return Ok(tree);
    }

    let mut walker = WalkDir::new(&root)
        .min_depth(1)
        .follow_links(options.follow_symlinks)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry
                .path()
                .strip_prefix(&root)
                .map_or(true, |relative| !filters::should_skip(relative, options))
        });

    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|e| ArchiveError::Io(e.into()))?;
        let path = entry.path();

        if exclude == Some(path) {
            tracing::debug!(path = %path.display(), "skipping output archive inside source");
            continue;
        }

        let relative = path.strip_prefix(&root).map_err(|_| {
            ArchiveError::validation(format!(
                "path {} is not under {}",
                path.display(),
                root.display()
            ))
        })?;
        let archive_name = filters::archive_name(&top, relative)?;
        let file_type = entry.file_type();

        if let Err(reason) = check_entry_name(&archive_name) {
            if file_type.is_dir() {
                walker.skip_current_dir();
            }
            tracing::warn!(entry = %archive_name, %reason, "skipping name the extractor would refuse");
            tree.warnings.push(format!("skipped {archive_name}: {reason}"));
            continue;
        }

        let (kind, size) = if file_type.is_dir() {
            (EntryKind::Directory, 0)
        } else if file_type.is_file() {
            (EntryKind::File, entry.metadata().map_err(|e| ArchiveError::Io(e.into()))?.len())
        } else {
            let what = if file_type.is_symlink() {
                "symlink"
            } else {
                "special file"
            };
            tracing::warn!(entry = %archive_name, "skipping {what}");
            tree.warnings.push(format!("skipped {what}: {archive_name}"));
            continue;
        };

        tree.entries.push(SourceEntry {
            path: path.to_path_buf(),
            archive_name,
            kind,
            size,
        });
    }

    Ok(tree)
}
