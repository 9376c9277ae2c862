//! Options for archive extraction.

use std::fmt;
use std::path::PathBuf;

use crate::CancelToken;

/// Optional ceilings applied while extracting.
///
/// All limits are disabled by default. When set they abort extraction with
/// `ArchiveError::QuotaExceeded`.
///
/// # Examples
///
/// ```
/// use sealpack_core::ExtractionLimits;
///
/// let limits = ExtractionLimits::default()
///     .with_max_total_size(Some(512 * 1024 * 1024))
///     .with_max_compression_ratio(Some(100.0));
/// assert_eq!(limits.max_file_count, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionLimits {
    /// Maximum bytes written across all entries, counted on actual output.
    pub max_total_size: Option<u64>,

    /// Maximum number of entries (files and directories) processed.
    pub max_file_count: Option<usize>,

    /// Maximum declared uncompressed / compressed ratio of a single entry.
    pub max_compression_ratio: Option<f64>,
}

impl ExtractionLimits {
    /// Limits suited to archives from untrusted sources.
    ///
    /// - `max_total_size`: 10 GiB
    /// - `max_file_count`: 100,000
    /// - `max_compression_ratio`: 100.0
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_total_size: Some(10 * 1024 * 1024 * 1024),
            max_file_count: Some(100_000),
            max_compression_ratio: Some(100.0),
        }
    }

    /// Sets the total size ceiling.
    #[must_use]
    pub fn with_max_total_size(mut self, max: Option<u64>) -> Self {
        self.max_total_size = max;
        self
    }

    /// Sets the entry count ceiling.
    #[must_use]
    pub fn with_max_file_count(mut self, max: Option<usize>) -> Self {
        self.max_file_count = max;
        self
    }

    /// Sets the per-entry compression ratio ceiling.
    #[must_use]
    pub fn with_max_compression_ratio(mut self, max: Option<f64>) -> Self {
        self.max_compression_ratio = max;
        self
    }
}

/// Options for `extract_archive` / `ArchiveReader::extract`.
///
/// The password is held only for the duration of the call and is never
/// written anywhere.
#[derive(Clone, Default)]
pub struct ExtractOptions {
    /// Extraction root. `None` extracts next to the archive.
    pub output_dir: Option<PathBuf>,

    /// Password checked against the archive's stored credential.
    pub password: Option<String>,

    /// Decompression limits.
    pub limits: ExtractionLimits,

    /// Checked between entries.
    pub cancel: Option<CancelToken>,

    /// Replace files that already exist under the output directory.
    /// Off by default, in which case an existing file aborts extraction.
    pub overwrite: bool,
}

impl fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("output_dir", &self.output_dir)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("limits", &self.limits)
            .field("cancel", &self.cancel)
            .field("overwrite", &self.overwrite)
            .finish()
    }
}

impl ExtractOptions {
    /// Creates options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the extraction root.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Sets the password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the decompression limits.
    #[must_use]
    pub fn with_limits(mut self, limits: ExtractionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Allows replacing existing files.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets the cancellation token.
    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits_disabled() {
        let limits = ExtractionLimits::default();
        assert_eq!(limits.max_total_size, None);
        assert_eq!(limits.max_file_count, None);
        assert_eq!(limits.max_compression_ratio, None);
    }

    #[test]
    fn test_strict_limits() {
        let limits = ExtractionLimits::strict();
        assert_eq!(limits.max_file_count, Some(100_000));
        assert_eq!(limits.max_compression_ratio, Some(100.0));
    }

    #[test]
    fn test_builder() {
        let options = ExtractOptions::new()
            .with_output_dir("/tmp/out")
            .with_password("secret")
            .with_limits(ExtractionLimits::default().with_max_file_count(Some(3)));
        assert_eq!(options.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(options.password.as_deref(), Some("secret"));
        assert_eq!(options.limits.max_file_count, Some(3));
        assert!(!options.overwrite);
        assert!(options.with_overwrite(true).overwrite);
    }

    #[test]
    fn test_debug_redacts_password() {
        let options = ExtractOptions::new().with_password("hunter2");
        let debug = format!("{options:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("redacted"));
    }
}
