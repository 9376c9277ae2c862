//! Error conversion utilities for CLI.
//!
//! Converts sealpack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use sealpack_core::ArchiveError;
use sealpack_core::QuotaResource;
use std::path::Path;

/// Converts `ArchiveError` to user-friendly anyhow error with context
pub fn convert_archive_error(err: ArchiveError, target: &Path) -> anyhow::Error {
    match err {
        ArchiveError::NotFound { path } => {
            anyhow!("File not found: {}", path.display())
        }
        ArchiveError::PasswordRequired => {
            anyhow!(
                "Archive '{}' is password protected\n\
                 HINT: Pass --password, or run in a terminal to be prompted.",
                target.display()
            )
        }
        ArchiveError::IncorrectPassword => {
            anyhow!("Incorrect password for '{}'", target.display())
        }
        ArchiveError::QuotaExceeded {
            resource: resource @ QuotaResource::CompressionRatio { .. },
        } => {
            anyhow!(
                "Security violation: Archive '{}' may be a zip bomb ({})\n\
                 HINT: Use --max-ratio to allow higher ratios if the source is trusted.",
                target.display(),
                resource
            )
        }
        ArchiveError::QuotaExceeded { resource } => {
            anyhow!(
                "Extraction limit exceeded for '{}': {}\n\
                 HINT: Use --max-files or --max-total-size to raise the limits.",
                target.display(),
                resource
            )
        }
        ArchiveError::Codec(zip_err) => {
            anyhow!(
                "Invalid archive '{}': {}\n\
                 HINT: The archive may be corrupted or not a ZIP file.",
                target.display(),
                zip_err
            )
        }
        ArchiveError::Extraction { path, source }
            if source.kind() == std::io::ErrorKind::AlreadyExists =>
        {
            anyhow!(
                "Failed to extract '{}' from '{}': file already exists\n\
                 HINT: Use --force to overwrite existing files.",
                path,
                target.display()
            )
        }
        ArchiveError::Extraction { path, source } => {
            anyhow!(
                "Failed to extract '{}' from '{}': {}",
                path,
                target.display(),
                source
            )
        }
        ArchiveError::Io(io_err) => {
            anyhow!("I/O error while processing '{}': {}", target.display(), io_err)
        }
        ArchiveError::Validation { reason } => {
            anyhow!("Invalid options: {reason}")
        }
        ArchiveError::Cancelled => anyhow!("Operation cancelled"),
        _ => anyhow::Error::from(err).context(format!("Error processing '{}'", target.display())),
    }
}

/// Adds context to a core result about the file being processed
pub fn add_archive_context<T>(
    result: Result<T, ArchiveError>,
    target: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_archive_error(e, target))
}
