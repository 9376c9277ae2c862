//! Chunked digest computation with percentage progress.

use std::fs::File;
use std::io::ErrorKind;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use std::time::Instant;

use subtle::ConstantTimeEq;

use super::HashAlgorithm;
use crate::error::DigestError;

/// Default read size per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Receives integer percentages (0-100) while a digest is computed.
///
/// Only called when the input length is known up front.
pub trait DigestProgress {
    /// Called after a chunk moved the percentage.
    fn on_progress(&mut self, percentage: u8);
}

impl<F: FnMut(u8)> DigestProgress for F {
    fn on_progress(&mut self, percentage: u8) {
        self(percentage);
    }
}

/// Output of one digest computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestResult {
    /// Algorithm used.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex digest.
    pub hex: String,
    /// Number of bytes hashed.
    pub byte_len: u64,
    /// Wall-clock time spent.
    pub duration: Duration,
}

impl DigestResult {
    /// Compares against an expected hex digest.
    ///
    /// Case-insensitive and constant-time in the digest contents.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealpack_core::hash::HashAlgorithm;
    /// use sealpack_core::hash::HashEngine;
    ///
    /// let result = HashEngine::new()
    ///     .digest(&b""[..], HashAlgorithm::Sha256, Some(0), None)
    ///     .unwrap();
    /// assert!(result.matches(
    ///     "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855"
    /// ));
    /// ```
    #[must_use]
    pub fn matches(&self, expected: &str) -> bool {
        let expected = expected.trim().to_ascii_lowercase();
        self.hex.as_bytes().ct_eq(expected.as_bytes()).into()
    }
}

/// Streams input through a digest in fixed-size chunks.
///
/// Peak memory is one chunk regardless of input size.
#[derive(Debug, Clone)]
pub struct HashEngine {
    chunk_size: usize,
}

impl Default for HashEngine {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl HashEngine {
    /// Creates an engine with the default chunk size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chunk size. Zero is raised to one byte.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Returns the chunk size.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Digests a byte stream.
    ///
    /// When `total_len` is known, `progress` receives
    /// `processed / total` as a rounded percentage each time a chunk
    /// changes it.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::Read` if the stream fails. No partial result
    /// is produced.
    pub fn digest<R: Read>(
        &self,
        mut reader: R,
        algorithm: HashAlgorithm,
        total_len: Option<u64>,
        mut progress: Option<&mut dyn DigestProgress>,
    ) -> Result<DigestResult, DigestError> {
        let start = Instant::now();
        let mut hasher = algorithm.hasher();
        let mut buffer = vec![0u8; self.chunk_size];
        let mut processed: u64 = 0;
        let mut last_reported: Option<u8> = None;

        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(DigestError::Read {
                        algorithm: algorithm.name(),
                        source,
                    });
                }
            };

            hasher.update(&buffer[..read]);
            processed += read as u64;

            if let (Some(total), Some(sink)) = (total_len, progress.as_deref_mut()) {
                let percentage = percentage(processed, total);
                if last_reported != Some(percentage) {
                    sink.on_progress(percentage);
                    last_reported = Some(percentage);
                }
            }
        }

        // Empty or short-declared inputs still finish at 100.
        if total_len.is_some()
            && last_reported != Some(100)
            && let Some(sink) = progress
        {
            sink.on_progress(100);
        }

        let digest = hasher.finalize();
        tracing::debug!(
            algorithm = algorithm.name(),
            bytes = processed,
            "digest computed"
        );

        Ok(DigestResult {
            algorithm,
            hex: hex::encode(digest),
            byte_len: processed,
            duration: start.elapsed(),
        })
    }

    /// Digests a file, reporting progress against its length.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::Read` if the file cannot be opened or read.
    pub fn digest_file(
        &self,
        path: &Path,
        algorithm: HashAlgorithm,
        progress: Option<&mut dyn DigestProgress>,
    ) -> Result<DigestResult, DigestError> {
        let read_error = |source| DigestError::Read {
            algorithm: algorithm.name(),
            source,
        };
        let file = File::open(path).map_err(read_error)?;
        let len = file.metadata().map_err(read_error)?.len();
        self.digest(file, algorithm, Some(len), progress)
    }

    /// Digests a file once per algorithm, in the order given.
    ///
    /// # Errors
    ///
    /// Stops at the first failing pass.
    pub fn digest_many(
        &self,
        path: &Path,
        algorithms: &[HashAlgorithm],
    ) -> Result<Vec<DigestResult>, DigestError> {
        algorithms
            .iter()
            .map(|algorithm| self.digest_file(path, *algorithm, None))
            .collect()
    }
}

fn percentage(processed: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let rounded = (u128::from(processed) * 100 + u128::from(total) / 2) / u128::from(total);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}
