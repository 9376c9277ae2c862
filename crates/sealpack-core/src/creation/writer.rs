//! ZIP archive writer.

use std::fs;
use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use zip::CompressionMethod;
use zip::ZipArchive;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::ArchiveError;
use crate::ProgressCallback;
use crate::Result;
use crate::cancel;
use crate::container;
use crate::copy::CopyBuffer;
use crate::creation::config::CreateOptions;
use crate::creation::metadata::ArchiveMetadata;
use crate::creation::metadata::compression_ratio;
use crate::creation::walker::SourceEntry;
use crate::creation::walker::collect_entries;
use crate::crypto::Credential;
use crate::hash::DigestProgress;
use crate::hash::HashEngine;
use crate::report::NoopProgress;
use crate::security::password;
use crate::types::EntryKind;

/// Writes a source file or directory into a ZIP archive.
///
/// The archive is assembled in a temporary file next to `output` and only
/// renamed into place once it is complete and readable, so a failed or
/// cancelled run never leaves a partial archive at `output`.
///
/// # Examples
///
/// ```no_run
/// use sealpack_core::CreateOptions;
/// use sealpack_core::creation::ArchiveWriter;
///
/// let options = CreateOptions::default().with_password("s3cret-Pass");
/// let metadata = ArchiveWriter::new(&options).create("project", "project.zip")?;
/// println!("{} entries, {:.1}% saved", metadata.entry_count, metadata.compression_ratio);
/// # Ok::<(), sealpack_core::ArchiveError>(())
/// ```
#[derive(Debug)]
pub struct ArchiveWriter<'a> {
    options: &'a CreateOptions,
    hash_engine: HashEngine,
}

impl<'a> ArchiveWriter<'a> {
    /// Creates a writer for the given options.
    #[must_use]
    pub fn new(options: &'a CreateOptions) -> Self {
        Self {
            options,
            hash_engine: HashEngine::new(),
        }
    }

    /// Replaces the engine used for the archive digest.
    #[must_use]
    pub fn with_hash_engine(mut self, engine: HashEngine) -> Self {
        self.hash_engine = engine;
        self
    }

    /// Creates an archive without progress reporting.
    ///
    /// # Errors
    ///
    /// See [`ArchiveWriter::create_with_progress`].
    pub fn create(
        &self,
        source: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<ArchiveMetadata> {
        self.create_with_progress(source, output, &mut NoopProgress, None)
    }

    /// Creates an archive, reporting entries to `progress` and the archive
    /// digest (if requested) to `digest_progress`.
    ///
    /// # Errors
    ///
    /// - `Validation`: invalid options or an unusable output path
    /// - `NotFound`: `source` does not exist
    /// - `Credential`: password derivation failed
    /// - `Codec`: the ZIP writer failed
    /// - `Io`: reading sources or writing the archive failed
    /// - `Digest`: hashing the finished archive failed
    /// - `Cancelled`: the cancel token fired between entries
    pub fn create_with_progress(
        &self,
        source: impl AsRef<Path>,
        output: impl AsRef<Path>,
        progress: &mut dyn ProgressCallback,
        digest_progress: Option<&mut dyn DigestProgress>,
    ) -> Result<ArchiveMetadata> {
        let start = Instant::now();
        let options = self.options;
        options.validate()?;

        let source = source.as_ref();
        let (output_dir, output_path) = resolve_output(output.as_ref())?;

        let tree = collect_entries(source, options, Some(output_path.as_path()))?;
        let mut warnings = tree.warnings;

        let credential = match options.password.as_deref() {
            Some(password) => {
                if let Some(warning) = password::assess(password).warning() {
                    tracing::warn!("weak password: {warning}");
                    warnings.push(warning);
                }
                Some(Credential::create(password, options.iterations)?)
            }
            None => None,
        };

        let mut temp = tempfile::Builder::new()
            .prefix(".sealpack-")
            .suffix(".zip.tmp")
            .tempfile_in(&output_dir)?;

        let (entry_count, uncompressed_size) = write_container(
            temp.as_file_mut(),
            &tree.entries,
            credential.as_ref(),
            options,
            progress,
        )?;
        temp.as_file().sync_all()?;

        let mut archive = ZipArchive::new(temp.reopen()?)?;
        let entries = container::entries(&mut archive)?;
        let compressed_size = entries.iter().map(|entry| entry.compressed_size).sum::<u64>();
        let archive_size = temp.as_file().metadata()?.len();

        temp.persist(&output_path)
            .map_err(|e| ArchiveError::Io(e.error))?;

        let digest = match options.hash_algorithm {
            Some(algorithm) => Some(self.hash_engine.digest_file(
                &output_path,
                algorithm,
                digest_progress,
            )?),
            None => None,
        };

        progress.on_complete();

        let metadata = ArchiveMetadata {
            output_path,
            archive_size,
            compressed_size,
            uncompressed_size,
            compression_ratio: compression_ratio(uncompressed_size, compressed_size),
            entry_count,
            entries,
            digest,
            password_protected: credential.is_some(),
            warnings,
            duration: start.elapsed(),
        };

        tracing::info!(
            output = %metadata.output_path.display(),
            entries = metadata.entry_count,
            uncompressed = metadata.uncompressed_size,
            compressed = metadata.compressed_size,
            protected = metadata.password_protected,
            "archive created"
        );

        Ok(metadata)
    }
}

/// Streams all entries into a ZIP container.
///
/// Returns the entry count and the total uncompressed bytes.
fn write_container<W: Write + Seek>(
    writer: W,
    entries: &[SourceEntry],
    credential: Option<&Credential>,
    options: &CreateOptions,
    progress: &mut dyn ProgressCallback,
) -> Result<(usize, u64)> {
    let mut zip = ZipWriter::new(writer);

    // The credential goes in before any entry so readers can gate on it.
    if let Some(credential) = credential {
        zip.set_comment(credential.to_string());
    }

    let file_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(i64::from(options.compression_level)));

    let total = entries.len();
    let mut buffer = CopyBuffer::new();
    let mut uncompressed: u64 = 0;

    for (index, entry) in entries.iter().enumerate() {
        cancel::check(options.cancel.as_ref())?;

        let entry_path = Path::new(&entry.archive_name);
        progress.on_entry_start(entry_path, total, index + 1);

        match entry.kind {
            EntryKind::Directory => {
                zip.add_directory(entry.archive_name.as_str(), file_options)?;
            }
            EntryKind::File => {
                let mut file = File::open(&entry.path)?;
                let entry_options = file_entry_options(file_options, &file, entry.size)?;
                zip.start_file(entry.archive_name.as_str(), entry_options)?;
                uncompressed += stream_file(&mut file, &mut zip, &mut buffer, progress)?;
            }
            EntryKind::Symlink => continue,
        }

        tracing::debug!(entry = %entry.archive_name, kind = %entry.kind, "entry written");
        progress.on_entry_complete(entry_path);
    }

    zip.finish()?;
    Ok((total, uncompressed))
}

fn file_entry_options(
    base: SimpleFileOptions,
    file: &File,
    size: u64,
) -> Result<SimpleFileOptions> {
    let options = base.large_file(size >= u64::from(u32::MAX));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = file.metadata()?.permissions().mode();
        Ok(options.unix_permissions(mode))
    }

    #[cfg(not(unix))]
    {
        let _ = file;
        Ok(options)
    }
}

fn stream_file<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
    progress: &mut dyn ProgressCallback,
) -> Result<u64> {
    let mut total: u64 = 0;
    buffer.copy(reader, writer, |chunk| {
        total += chunk;
        progress.on_bytes_written(chunk);
        Ok(())
    })?;
    Ok(total)
}

/// Returns the canonical output directory (created if missing) and the
/// absolute output path inside it.
fn resolve_output(output: &Path) -> Result<(PathBuf, PathBuf)> {
    let file_name = output.file_name().ok_or_else(|| {
        ArchiveError::validation(format!("output path has no file name: {}", output.display()))
    })?;
    if output.is_dir() {
        return Err(ArchiveError::validation(format!(
            "output path is a directory: {}",
            output.display()
        )));
    }

    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    let dir = parent.canonicalize()?;
    let path = dir.join(file_name);
    Ok((dir, path))
}
