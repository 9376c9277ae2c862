//! Output formatter trait for CLI results.

use anyhow::Result;
use sealpack_core::ArchiveEntry;
use sealpack_core::ArchiveMetadata;
use sealpack_core::DigestResult;
use sealpack_core::ExtractionReport;
use serde::Serialize;
use std::path::Path;

/// Listing of an archive as shown by `list`.
pub struct Listing<'a> {
    pub archive: &'a Path,
    pub password_protected: bool,
    pub entries: &'a [ArchiveEntry],
}

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format archive creation result
    fn format_creation_result(&self, metadata: &ArchiveMetadata) -> Result<()>;

    /// Format extraction result
    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()>;

    /// Format entry names only
    fn format_listing_short(&self, listing: &Listing<'_>) -> Result<()>;

    /// Format entries with kind and sizes
    fn format_listing_long(&self, listing: &Listing<'_>, human_readable: bool) -> Result<()>;

    /// Format digests of one file; `matched` is set when an expected digest
    /// was given
    fn format_digests(
        &self,
        file: &Path,
        digests: &[DigestResult],
        matched: Option<bool>,
    ) -> Result<()>;

    /// Format the password check of an archive
    fn format_check(&self, archive: &Path, password_required: bool, entries: usize)
    -> Result<()>;

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Warning,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
        }
    }

    pub fn warning(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Warning,
            data: Some(data),
        }
    }
}
