//! ZIP archive reader.

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use zip::ZipArchive;

use crate::ArchiveError;
use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::Result;
use crate::cancel;
use crate::container;
use crate::copy::CopyBuffer;
use crate::crypto;
use crate::extraction::config::ExtractOptions;
use crate::report::NoopProgress;
use crate::security::QuotaTracker;
use crate::security::UnsafeReason;
use crate::security::validate_compression_ratio;
use crate::types::ArchiveEntry;
use crate::types::DestDir;
use crate::types::EntryKind;

/// Reads a ZIP archive and extracts it behind the password gate.
///
/// Entries are decompressed one at a time straight to disk. Unsafe entries
/// are skipped and reported; stream faults abort.
///
/// # Examples
///
/// ```no_run
/// use sealpack_core::ExtractOptions;
/// use sealpack_core::extraction::ArchiveReader;
///
/// let mut reader = ArchiveReader::open("project.zip")?;
/// let mut options = ExtractOptions::new().with_output_dir("restored");
/// if reader.requires_password() {
///     options = options.with_password("s3cret-Pass");
/// }
/// let report = reader.extract(&options)?;
/// for warning in report.warnings() {
///     eprintln!("{warning}");
/// }
/// # Ok::<(), sealpack_core::ArchiveError>(())
/// ```
#[derive(Debug)]
pub struct ArchiveReader {
    path: PathBuf,
    archive: ZipArchive<File>,
}

impl ArchiveReader {
    /// Opens an archive and reads its central directory.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file is missing and `Codec` if it is not a
    /// readable ZIP container.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let archive = container::open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    /// Returns `true` if the archive carries a credential.
    #[must_use]
    pub fn requires_password(&self) -> bool {
        self.credential().is_some()
    }

    /// Returns the encoded credential stored in the archive comment.
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        container::credential_comment(&self.archive)
    }

    /// Checks a password against the stored credential.
    ///
    /// Unprotected archives accept any input, including `None`.
    ///
    /// # Errors
    ///
    /// Returns `PasswordRequired` if the archive is protected and no
    /// password was given, `IncorrectPassword` if it does not verify.
    pub fn verify_password(&self, password: Option<&str>) -> Result<()> {
        let Some(credential) = self.credential() else {
            return Ok(());
        };
        let Some(password) = password else {
            return Err(ArchiveError::PasswordRequired);
        };
        if crypto::verify(password, credential) {
            Ok(())
        } else {
            Err(ArchiveError::IncorrectPassword)
        }
    }

    /// Number of entries in the container.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns `true` if the container has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// Lists entries without extracting. Does not require the password.
    ///
    /// # Errors
    ///
    /// Returns `Codec` if an entry record cannot be read.
    pub fn entries(&mut self) -> Result<Vec<ArchiveEntry>> {
        container::entries(&mut self.archive)
    }

    /// Extracts without progress reporting.
    ///
    /// # Errors
    ///
    /// See [`ArchiveReader::extract_with_progress`].
    pub fn extract(&mut self, options: &ExtractOptions) -> Result<ExtractionReport> {
        self.extract_with_progress(options, &mut NoopProgress)
    }

    /// Extracts every safe entry under the output directory.
    ///
    /// The password is checked before anything is created on disk. Without
    /// `output_dir` the archive's own directory is used.
    ///
    /// # Errors
    ///
    /// - `PasswordRequired` / `IncorrectPassword`: gate failed, nothing written
    /// - `Io`: the output directory cannot be prepared
    /// - `Codec`: an entry header cannot be read
    /// - `Extraction`: streaming one entry to disk failed
    /// - `QuotaExceeded`: an explicit limit was hit
    /// - `Cancelled`: the cancel token fired between entries
    pub fn extract_with_progress(
        &mut self,
        options: &ExtractOptions,
        progress: &mut dyn ProgressCallback,
    ) -> Result<ExtractionReport> {
        let start = Instant::now();
        self.verify_password(options.password.as_deref())?;

        let dest = DestDir::prepare(self.output_root(options))?;
        let mut report = ExtractionReport::new(dest.as_path());
        let mut quota = QuotaTracker::new(&options.limits);
        let mut buffer = CopyBuffer::new();
        let total = self.archive.len();

        for index in 0..total {
            cancel::check(options.cancel.as_ref())?;
            quota.record_entry()?;

            let mut file = self.archive.by_index(index)?;
            let name = file.name().to_string();
            let entry_path = Path::new(&name);
            progress.on_entry_start(entry_path, total, index + 1);

            let kind = container::entry_kind(&file);
            let target = match kind {
                EntryKind::Symlink => Err(UnsafeReason::Symlink),
                EntryKind::File | EntryKind::Directory => dest.resolve(&name),
            };
            let target = match target {
                Ok(target) => target,
                Err(reason) => {
                    skip(&mut report, name, reason);
                    continue;
                }
            };

            match kind {
                EntryKind::Directory => {
                    if !dest.ensure_dir(&target).map_err(|e| extraction_error(&name, e))? {
                        skip(&mut report, name, UnsafeReason::LinkedAncestor);
                        continue;
                    }
                    report.directories_created += 1;
                }
                EntryKind::File => {
                    validate_compression_ratio(
                        &name,
                        file.compressed_size(),
                        file.size(),
                        &options.limits,
                    )?;

                    let parent = target.parent().unwrap_or(dest.as_path());
                    let parent_ok = dest
                        .ensure_dir(parent)
                        .map_err(|e| extraction_error(&name, e))?;
                    if !parent_ok || is_symlink(&target) {
                        skip(&mut report, name, UnsafeReason::LinkedAncestor);
                        continue;
                    }

                    let mut output = open_output(&target, options.overwrite)
                        .map_err(|e| extraction_error(&name, e))?;
                    let copied = buffer.copy(&mut file, &mut output, |chunk| {
                        quota.record_bytes(chunk)?;
                        progress.on_bytes_written(chunk);
                        Ok(())
                    });
                    if let Err(err) = copied {
                        drop(output);
                        let _ = fs::remove_file(&target);
                        return Err(match err {
                            ArchiveError::Io(source) => extraction_error(&name, source),
                            other => other,
                        });
                    }

                    #[cfg(unix)]
                    {
                        use std::os::unix::fs::PermissionsExt;
                        if let Some(mode) = file.unix_mode() {
                            let permissions = fs::Permissions::from_mode(mode & 0o777);
                            fs::set_permissions(&target, permissions)
                                .map_err(|e| extraction_error(&name, e))?;
                        }
                    }

                    report.files_extracted += 1;
                }
                EntryKind::Symlink => continue,
            }

            tracing::debug!(entry = %name, %kind, "entry extracted");
            progress.on_entry_complete(entry_path);
        }

        report.bytes_written = quota.bytes_written();
        report.duration = start.elapsed();
        progress.on_complete();

        tracing::info!(
            archive = %self.path.display(),
            output = %report.output_dir.display(),
            files = report.files_extracted,
            directories = report.directories_created,
            skipped = report.skipped.len(),
            "archive extracted"
        );

        Ok(report)
    }

    fn output_root(&self, options: &ExtractOptions) -> PathBuf {
        if let Some(dir) = &options.output_dir {
            return dir.clone();
        }
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

fn skip(report: &mut ExtractionReport, name: String, reason: UnsafeReason) {
    tracing::warn!(entry = %name, %reason, "skipping unsafe entry");
    report.skip(name, reason);
}

fn extraction_error(name: &str, source: io::Error) -> ArchiveError {
    ArchiveError::Extraction {
        path: name.to_string(),
        source,
    }
}

/// Opens an entry's output file. Without `overwrite` the file must not
/// already exist.
fn open_output(target: &Path, overwrite: bool) -> io::Result<File> {
    let mut open = OpenOptions::new();
    open.write(true);
    if overwrite {
        open.create(true).truncate(true);
    } else {
        open.create_new(true);
    }
    open.open(target)
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink())
}
