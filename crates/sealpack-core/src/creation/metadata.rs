//! Result of archive creation.

use std::path::PathBuf;
use std::time::Duration;

use crate::hash::DigestResult;
use crate::types::ArchiveEntry;

/// Facts about a finished archive.
#[derive(Debug, Clone)]
pub struct ArchiveMetadata {
    /// Where the archive was written.
    pub output_path: PathBuf,
    /// Size of the archive file on disk.
    pub archive_size: u64,
    /// Sum of compressed entry sizes.
    pub compressed_size: u64,
    /// Sum of source file sizes.
    pub uncompressed_size: u64,
    /// Space saved by compression, in percent. Negative if it grew.
    pub compression_ratio: f64,
    /// Number of entries written (files and directories).
    pub entry_count: usize,
    /// Entries as read back from the finished container.
    pub entries: Vec<ArchiveEntry>,
    /// Digest of the archive file, if one was requested.
    pub digest: Option<DigestResult>,
    /// Whether a credential was embedded.
    pub password_protected: bool,
    /// Non-fatal notes: weak password, skipped symlinks.
    pub warnings: Vec<String>,
    /// Wall-clock time spent.
    pub duration: Duration,
}

/// `(uncompressed - compressed) / uncompressed * 100`, or 0 for empty input.
///
/// # Examples
///
/// ```
/// use sealpack_core::creation::compression_ratio;
///
/// assert_eq!(compression_ratio(100, 25), 75.0);
/// assert_eq!(compression_ratio(0, 22), 0.0);
/// assert!(compression_ratio(10, 20) < 0.0);
/// ```
#[must_use]
pub fn compression_ratio(uncompressed: u64, compressed: u64) -> f64 {
    if uncompressed == 0 {
        return 0.0;
    }
    let uncompressed = uncompressed as f64;
    (uncompressed - compressed as f64) / uncompressed * 100.0
}
