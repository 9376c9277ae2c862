//! Password-gated ZIP archiving with path-traversal protection.
//!
//! `sealpack-core` packs a file or directory into a ZIP archive and unpacks
//! it again, adding three guarantees on top of a plain archiver:
//!
//! - **Path safety**: every entry is resolved against the extraction root
//!   before anything is written; entries that would escape it are skipped
//!   and reported instead of aborting the whole extraction.
//! - **Integrity**: SHA-2 and BLAKE3 digests computed in bounded memory.
//! - **Password gate**: an Argon2id credential (never the password) is
//!   stored in the archive comment and checked before any entry is read.
//!
//! # Limitation
//!
//! The password gates extraction through this library only. Entry data is
//! **not encrypted**; any ZIP tool can read it. Do not rely on the password
//! for confidentiality.
//!
//! # Examples
//!
//! ```no_run
//! use sealpack_core::CreateOptions;
//! use sealpack_core::ExtractOptions;
//! use sealpack_core::create_archive;
//! use sealpack_core::extract_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = CreateOptions::default().with_password("Tr0ub4dor&3");
//! create_archive("project", "project.zip", &options)?;
//!
//! let report = extract_archive(
//!     "project.zip",
//!     &ExtractOptions::new()
//!         .with_output_dir("restored")
//!         .with_password("Tr0ub4dor&3"),
//! )?;
//! println!("Extracted {} files", report.files_extracted);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod cancel;
mod container;
mod copy;
pub mod creation;
pub mod crypto;
pub mod error;
pub mod extraction;
pub mod hash;
pub mod report;
pub mod security;
pub mod types;

#[doc(hidden)]
pub mod test_utils;

pub use api::create_archive;
pub use api::create_archive_with_progress;
pub use api::digest_file;
pub use api::extract_archive;
pub use api::extract_archive_with_progress;
pub use api::list_entries;
pub use api::requires_password;
pub use api::verify_file_digest;
pub use cancel::CancelToken;
pub use creation::ArchiveMetadata;
pub use creation::ArchiveWriter;
pub use creation::CreateOptions;
pub use error::ArchiveError;
pub use error::CredentialError;
pub use error::DigestError;
pub use error::QuotaResource;
pub use error::Result;
pub use extraction::ArchiveReader;
pub use extraction::ExtractOptions;
pub use extraction::ExtractionLimits;
pub use hash::DigestProgress;
pub use hash::DigestResult;
pub use hash::HashAlgorithm;
pub use hash::HashEngine;
pub use report::ExtractionReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use report::SkippedEntry;
pub use types::ArchiveEntry;
pub use types::DestDir;
pub use types::EntryKind;
