//! Builders for crafted ZIP archives used in tests.
//!
//! Unlike `ArchiveWriter`, nothing here validates names, so tests can
//! produce traversal entries, symlinks and forged credential comments.
//!
//! # Panics
//!
//! Builder methods panic on codec errors; they are meant for tests only.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Builds a ZIP archive in memory.
///
/// # Examples
///
/// ```
/// use sealpack_core::test_utils::ZipBuilder;
///
/// let data = ZipBuilder::new()
///     .file("../escape.txt", b"payload")
///     .directory("dir")
///     .build();
/// assert!(!data.is_empty());
/// ```
pub struct ZipBuilder {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Sets the archive comment.
    #[must_use]
    pub fn comment(mut self, comment: &str) -> Self {
        self.zip.set_comment(comment);
        self
    }

    /// Adds a deflated file with mode 0o644.
    #[must_use]
    pub fn file(mut self, name: &str, data: &[u8]) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);
        self.zip.start_file(name, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a stored (uncompressed) file.
    #[must_use]
    pub fn stored_file(mut self, name: &str, data: &[u8]) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .unix_permissions(0o644);
        self.zip.start_file(name, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a directory entry.
    #[must_use]
    pub fn directory(mut self, name: &str) -> Self {
        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(name, options).unwrap();
        self
    }

    /// Adds a symlink entry pointing at `target`.
    #[must_use]
    pub fn symlink(mut self, name: &str, target: &str) -> Self {
        self.zip
            .add_symlink(name, target, SimpleFileOptions::default())
            .unwrap();
        self
    }

    /// Finishes the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }

    /// Finishes the archive and writes it to `path`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from writing the file.
    pub fn write_to(self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.build())
    }
}

impl Default for ZipBuilder {
    fn default() -> Self {
        Self::new()
    }
}
