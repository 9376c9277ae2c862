//! Error types for archive creation, extraction, hashing and credentials.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Represents a specific extraction limit that was exceeded.
#[derive(Debug, Clone, PartialEq)]
pub enum QuotaResource {
    /// Entry count limit exceeded.
    FileCount {
        /// Current entry count.
        current: usize,
        /// Maximum allowed entry count.
        max: usize,
    },
    /// Total extracted size limit exceeded.
    TotalSize {
        /// Bytes written so far.
        current: u64,
        /// Maximum allowed total size in bytes.
        max: u64,
    },
    /// Per-entry compression ratio limit exceeded.
    CompressionRatio {
        /// Entry name as stored in the archive.
        entry: String,
        /// Observed uncompressed / compressed ratio.
        ratio: f64,
        /// Maximum allowed ratio.
        max: f64,
    },
    /// Integer overflow detected in quota tracking.
    IntegerOverflow,
}

impl std::fmt::Display for QuotaResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileCount { current, max } => {
                write!(f, "quota exceeded: entry count ({current} > {max})")
            }
            Self::TotalSize { current, max } => {
                write!(f, "quota exceeded: total size ({current} > {max})")
            }
            Self::CompressionRatio { entry, ratio, max } => {
                write!(
                    f,
                    "quota exceeded: compression ratio of {entry} ({ratio:.2} > {max:.2})"
                )
            }
            Self::IntegerOverflow => {
                write!(f, "quota exceeded: integer overflow in quota tracking")
            }
        }
    }
}

/// Errors raised while parsing or deriving a password credential.
///
/// `verify` never surfaces these; it maps every failure to `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Credential string does not have four `$`-delimited fields.
    #[error("malformed credential")]
    Malformed,

    /// Algorithm tag is not one this build understands.
    #[error("unsupported credential algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Iteration count is zero or above the accepted ceiling.
    #[error("invalid iteration count: {0}")]
    InvalidIterations(u64),

    /// Salt is too short or not valid hex.
    #[error("invalid salt")]
    InvalidSalt,

    /// Key stretching failed.
    #[error("key derivation failed: {0}")]
    Derivation(String),
}

/// Errors raised by the hash engine.
#[derive(Error, Debug)]
pub enum DigestError {
    /// Reading the input stream failed.
    #[error("failed to read input for {algorithm}: {source}")]
    Read {
        /// Algorithm being computed when the read failed.
        algorithm: &'static str,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Algorithm name is not supported.
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Errors that can occur while creating or extracting archives.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Source file/directory or archive does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Archive carries a credential but no password was supplied.
    #[error("archive is password protected; a password is required")]
    PasswordRequired,

    /// Supplied password does not match the stored credential.
    #[error("incorrect password")]
    IncorrectPassword,

    /// Entry would be written outside the extraction root.
    ///
    /// Reported as a warning during extraction, never returned as the
    /// result of a whole operation.
    #[error("unsafe entry path skipped: {path} ({reason})")]
    UnsafePath {
        /// Entry name as stored in the archive.
        path: String,
        /// Why the entry was rejected.
        reason: String,
    },

    /// Underlying compression container fault.
    #[error("archive codec error: {0}")]
    Codec(#[from] zip::result::ZipError),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Options or inputs are malformed.
    #[error("invalid options: {reason}")]
    Validation {
        /// Description of the problem.
        reason: String,
    },

    /// Streaming a single entry to disk failed.
    #[error("failed to extract {path}: {source}")]
    Extraction {
        /// Entry name as stored in the archive.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Digest computation failed.
    #[error(transparent)]
    Digest(#[from] DigestError),

    /// Credential derivation failed while creating an archive.
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Extraction limit exceeded.
    #[error("{resource}")]
    QuotaExceeded {
        /// Description of the exceeded resource.
        resource: QuotaResource,
    },

    /// Operation was cancelled between entries.
    #[error("operation cancelled")]
    Cancelled,
}

impl ArchiveError {
    /// Returns the stable code of this error's message family.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealpack_core::ArchiveError;
    ///
    /// assert_eq!(ArchiveError::IncorrectPassword.code(), "INCORRECT_PASSWORD");
    /// assert_eq!(ArchiveError::PasswordRequired.code(), "PASSWORD_REQUIRED");
    /// ```
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::PasswordRequired => "PASSWORD_REQUIRED",
            Self::IncorrectPassword => "INCORRECT_PASSWORD",
            Self::UnsafePath { .. } => "UNSAFE_PATH_SKIPPED",
            Self::Codec(_) => "CODEC_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Validation { .. } | Self::Digest(DigestError::UnsupportedAlgorithm(_)) => {
                "VALIDATION_ERROR"
            }
            Self::Extraction { .. } => "EXTRACTION_ERROR",
            Self::Digest(DigestError::Read { .. }) => "DIGEST_ERROR",
            Self::Credential(_) => "CREDENTIAL_ERROR",
            Self::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns `true` if the operation may continue past this error.
    ///
    /// Only unsafe entry paths are recovered locally; everything else aborts
    /// the current operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealpack_core::ArchiveError;
    ///
    /// let err = ArchiveError::UnsafePath {
    ///     path: "../etc/passwd".into(),
    ///     reason: "escapes extraction root".into(),
    /// };
    /// assert!(err.is_recoverable());
    /// assert!(!ArchiveError::IncorrectPassword.is_recoverable());
    /// ```
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnsafePath { .. })
    }

    /// Returns `true` if this error represents a security decision.
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::PasswordRequired
                | Self::IncorrectPassword
                | Self::UnsafePath { .. }
                | Self::QuotaExceeded { .. }
        )
    }

    /// Shorthand for a `Validation` error.
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }
}
