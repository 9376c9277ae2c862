//! High-level entry points.

use std::path::Path;

use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::Result;
use crate::creation::ArchiveMetadata;
use crate::creation::ArchiveWriter;
use crate::creation::CreateOptions;
use crate::extraction::ArchiveReader;
use crate::extraction::ExtractOptions;
use crate::hash::DigestProgress;
use crate::hash::DigestResult;
use crate::hash::HashAlgorithm;
use crate::hash::HashEngine;
use crate::types::ArchiveEntry;

/// Creates a ZIP archive from a file or directory.
///
/// A directory is stored under its own name, so `create_archive("proj", ..)`
/// extracts into `proj/`.
///
/// # Errors
///
/// Returns an error if:
/// - Options are invalid (`Validation`)
/// - The source does not exist (`NotFound`)
/// - Reading sources or writing the archive fails (`Io`, `Codec`)
///
/// # Examples
///
/// ```no_run
/// use sealpack_core::CreateOptions;
/// use sealpack_core::create_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let options = CreateOptions::default().with_password("Tr0ub4dor&3");
/// let metadata = create_archive("./project", "project.zip", &options)?;
/// println!("{} entries", metadata.entry_count);
/// # Ok(())
/// # }
/// ```
pub fn create_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    output: Q,
    options: &CreateOptions,
) -> Result<ArchiveMetadata> {
    ArchiveWriter::new(options).create(source, output)
}

/// Creates a ZIP archive with progress reporting.
///
/// # Errors
///
/// Same as [`create_archive`].
pub fn create_archive_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    output: Q,
    options: &CreateOptions,
    progress: &mut dyn ProgressCallback,
    digest_progress: Option<&mut dyn DigestProgress>,
) -> Result<ArchiveMetadata> {
    ArchiveWriter::new(options).create_with_progress(source, output, progress, digest_progress)
}

/// Extracts an archive after checking its password.
///
/// Entries that would land outside the output directory are skipped and
/// listed in [`ExtractionReport::skipped`].
///
/// # Errors
///
/// Returns an error if:
/// - The archive does not exist (`NotFound`)
/// - It is protected and no password was given (`PasswordRequired`)
/// - The password is wrong (`IncorrectPassword`)
/// - An entry cannot be streamed to disk (`Extraction`)
///
/// # Examples
///
/// ```no_run
/// use sealpack_core::ExtractOptions;
/// use sealpack_core::extract_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let options = ExtractOptions::new()
///     .with_output_dir("/tmp/restore")
///     .with_password("Tr0ub4dor&3");
/// let report = extract_archive("project.zip", &options)?;
/// println!("Extracted into {}", report.output_dir.display());
/// # Ok(())
/// # }
/// ```
pub fn extract_archive<P: AsRef<Path>>(
    archive: P,
    options: &ExtractOptions,
) -> Result<ExtractionReport> {
    ArchiveReader::open(archive)?.extract(options)
}

/// Extracts an archive with progress reporting.
///
/// # Errors
///
/// Same as [`extract_archive`].
pub fn extract_archive_with_progress<P: AsRef<Path>>(
    archive: P,
    options: &ExtractOptions,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    ArchiveReader::open(archive)?.extract_with_progress(options, progress)
}

/// Returns `true` if extracting the archive needs a password.
///
/// # Errors
///
/// Returns `NotFound` or `Codec` if the archive cannot be opened.
pub fn requires_password<P: AsRef<Path>>(archive: P) -> Result<bool> {
    Ok(ArchiveReader::open(archive)?.requires_password())
}

/// Lists archive entries without extracting or checking the password.
///
/// # Errors
///
/// Returns `NotFound` or `Codec` if the archive cannot be read.
pub fn list_entries<P: AsRef<Path>>(archive: P) -> Result<Vec<ArchiveEntry>> {
    ArchiveReader::open(archive)?.entries()
}

/// Computes a digest of a file.
///
/// # Errors
///
/// Returns `Digest` if the file cannot be read.
pub fn digest_file<P: AsRef<Path>>(path: P, algorithm: HashAlgorithm) -> Result<DigestResult> {
    Ok(HashEngine::new().digest_file(path.as_ref(), algorithm, None)?)
}

/// Returns `true` if the file's digest equals `expected_hex`.
///
/// The comparison ignores hex case.
///
/// # Errors
///
/// Returns `Digest` if the file cannot be read.
pub fn verify_file_digest<P: AsRef<Path>>(
    path: P,
    algorithm: HashAlgorithm,
    expected_hex: &str,
) -> Result<bool> {
    Ok(digest_file(path, algorithm)?.matches(expected_hex))
}
