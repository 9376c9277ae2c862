//! Options for archive creation.

use std::fmt;

use crate::ArchiveError;
use crate::CancelToken;
use crate::Result;
use crate::crypto::credential::DEFAULT_ITERATIONS;
use crate::crypto::credential::MAX_ITERATIONS;
use crate::hash::HashAlgorithm;

/// Lowest accepted compression level.
pub const MIN_COMPRESSION_LEVEL: u8 = 1;

/// Highest accepted compression level, also the default.
pub const MAX_COMPRESSION_LEVEL: u8 = 9;

/// Options for `create_archive` / `ArchiveWriter`.
///
/// # Examples
///
/// ```
/// use sealpack_core::CreateOptions;
/// use sealpack_core::hash::HashAlgorithm;
///
/// let options = CreateOptions::default()
///     .with_password("correct horse battery staple")
///     .with_compression_level(6)
///     .with_hash_algorithm(Some(HashAlgorithm::Sha256))
///     .with_exclude_patterns(vec!["*.tmp".into(), ".git".into()]);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct CreateOptions {
    /// Password gating extraction. Only a derived credential is stored.
    pub password: Option<String>,

    /// Deflate level, 1 (fastest) to 9 (smallest).
    ///
    /// Default: 9.
    pub compression_level: u8,

    /// Digest to compute over the finished archive file.
    ///
    /// Default: `None`.
    pub hash_algorithm: Option<HashAlgorithm>,

    /// Patterns to exclude, matched against every path component.
    ///
    /// Supports exact names, `*.ext` and `prefix*`. Default: empty.
    pub exclude_patterns: Vec<String>,

    /// Include files and directories whose name starts with `.`.
    ///
    /// Default: `true`, so a round trip reproduces the tree exactly.
    pub include_hidden: bool,

    /// Follow symlinks inside the source tree.
    ///
    /// Default: `false` (symlinks are skipped with a warning).
    pub follow_symlinks: bool,

    /// Key-stretching work factor for the password credential.
    ///
    /// Default: `DEFAULT_ITERATIONS`.
    pub iterations: u32,

    /// Checked between entries.
    pub cancel: Option<CancelToken>,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            password: None,
            compression_level: MAX_COMPRESSION_LEVEL,
            hash_algorithm: None,
            exclude_patterns: Vec::new(),
            include_hidden: true,
            follow_symlinks: false,
            iterations: DEFAULT_ITERATIONS,
            cancel: None,
        }
    }
}

impl fmt::Debug for CreateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateOptions")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("compression_level", &self.compression_level)
            .field("hash_algorithm", &self.hash_algorithm)
            .field("exclude_patterns", &self.exclude_patterns)
            .field("include_hidden", &self.include_hidden)
            .field("follow_symlinks", &self.follow_symlinks)
            .field("iterations", &self.iterations)
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl CreateOptions {
    /// Creates options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the compression level.
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level;
        self
    }

    /// Sets the digest to compute over the finished archive.
    #[must_use]
    pub fn with_hash_algorithm(mut self, algorithm: Option<HashAlgorithm>) -> Self {
        self.hash_algorithm = algorithm;
        self
    }

    /// Sets exclusion patterns.
    #[must_use]
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Sets whether hidden files are included.
    #[must_use]
    pub fn with_include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Sets whether symlinks are followed.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Sets the credential work factor.
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the cancellation token.
    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::Validation` if the compression level is
    /// outside 1-9, the password is empty, the work factor is out of range
    /// or an exclusion pattern is empty.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_COMPRESSION_LEVEL..=MAX_COMPRESSION_LEVEL).contains(&self.compression_level) {
            return Err(ArchiveError::validation(format!(
                "compression level must be {MIN_COMPRESSION_LEVEL}-{MAX_COMPRESSION_LEVEL}, got {}",
                self.compression_level
            )));
        }

        if self.password.as_deref().is_some_and(str::is_empty) {
            return Err(ArchiveError::validation("password must not be empty"));
        }

        if self.iterations == 0 || self.iterations > MAX_ITERATIONS {
            return Err(ArchiveError::validation(format!(
                "iterations must be 1-{MAX_ITERATIONS}, got {}",
                self.iterations
            )));
        }

        if self.exclude_patterns.iter().any(String::is_empty) {
            return Err(ArchiveError::validation(
                "exclude patterns must not be empty",
            ));
        }

        Ok(())
    }
}
