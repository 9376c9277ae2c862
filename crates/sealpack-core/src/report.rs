//! Extraction reporting and progress callbacks.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::security::UnsafeReason;

/// An entry that extraction refused to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Entry name as stored in the archive.
    pub name: String,
    /// Why it was skipped.
    pub reason: UnsafeReason,
}

/// Report of an archive extraction operation.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Canonical directory the archive was extracted into.
    pub output_dir: PathBuf,

    /// Number of files successfully extracted.
    pub files_extracted: usize,

    /// Number of directory entries created.
    pub directories_created: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Entries skipped by the path guard, in archive order.
    pub skipped: Vec<SkippedEntry>,

    /// Duration of the extraction operation.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates an empty report for `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Records a skipped entry.
    pub fn skip(&mut self, name: impl Into<String>, reason: UnsafeReason) {
        self.skipped.push(SkippedEntry {
            name: name.into(),
            reason,
        });
    }

    /// Human-readable warning per skipped entry.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.skipped
            .iter()
            .map(|entry| format!("skipped {}: {}", entry.name, entry.reason))
            .collect()
    }

    /// Returns total number of items written.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created
    }

    /// Returns whether any entry was skipped.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Callback trait for progress reporting during archive operations.
///
/// Implement this trait to receive progress updates during extraction or
/// creation. The trait requires `Send` to allow use in multi-threaded contexts.
///
/// # Examples
///
/// ```
/// use sealpack_core::ProgressCallback;
/// use std::path::Path;
///
/// struct Counter(usize);
///
/// impl ProgressCallback for Counter {
///     fn on_entry_start(&mut self, path: &Path, total: usize, current: usize) {
///         println!("[{current}/{total}] {}", path.display());
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_entry_complete(&mut self, _path: &Path) {
///         self.0 += 1;
///     }
///
///     fn on_complete(&mut self) {}
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called when starting to process an entry.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the entry being processed
    /// * `total` - Total number of entries
    /// * `current` - Current entry number (1-indexed)
    fn on_entry_start(&mut self, path: &Path, total: usize, current: usize);

    /// Called when bytes are written during extraction or read during creation.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called when an entry has been completely processed.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called when the entire operation is complete.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report() {
        let report = ExtractionReport::new("/out");
        assert_eq!(report.output_dir, PathBuf::from("/out"));
        assert_eq!(report.files_extracted, 0);
        assert_eq!(report.bytes_written, 0);
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_skip_produces_warning() {
        let mut report = ExtractionReport::new("/out");
        report.skip("../../etc/passwd", UnsafeReason::EscapesRoot);
        assert!(report.has_warnings());
        let warnings = report.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("../../etc/passwd"));
        assert!(warnings[0].contains("outside"));
    }

    #[test]
    fn test_total_items() {
        let mut report = ExtractionReport::new("/out");
        report.files_extracted = 10;
        report.directories_created = 5;
        assert_eq!(report.total_items(), 15);
    }
}
