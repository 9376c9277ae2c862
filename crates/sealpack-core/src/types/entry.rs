//! Archive entry records.

use std::fmt;

/// Kind of an archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory; stored so empty directories round-trip.
    Directory,
    /// Symbolic link. Never written by this crate and never extracted.
    Symlink,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Directory => f.write_str("directory"),
            Self::Symlink => f.write_str("symlink"),
        }
    }
}

/// One file or directory record inside a container.
///
/// `path` uses `/` separators and is relative to the archive root.
/// Directory paths carry no trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Relative entry path.
    pub path: String,
    /// File or directory.
    pub kind: EntryKind,
    /// Uncompressed byte length.
    pub size: u64,
    /// Compressed byte length inside the container.
    pub compressed_size: u64,
}

impl ArchiveEntry {
    /// Creates a file entry whose compressed size is not yet known.
    #[must_use]
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            size,
            compressed_size: 0,
        }
    }

    /// Creates a directory entry.
    #[must_use]
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            size: 0,
            compressed_size: 0,
        }
    }

    /// Returns `true` for directory entries.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Name as stored in the container; directories get a trailing `/`.
    #[must_use]
    pub fn stored_name(&self) -> String {
        match self.kind {
            EntryKind::Directory => format!("{}/", self.path),
            EntryKind::File | EntryKind::Symlink => self.path.clone(),
        }
    }
}
