//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::Listing;
use super::formatter::OutputFormatter;
use anyhow::Result;
use sealpack_core::ArchiveEntry;
use sealpack_core::ArchiveMetadata;
use sealpack_core::DigestResult;
use sealpack_core::ExtractionReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct EntryOutput<'a> {
    path: &'a str,
    kind: String,
    size: u64,
    compressed_size: u64,
}

impl<'a> From<&'a ArchiveEntry> for EntryOutput<'a> {
    fn from(entry: &'a ArchiveEntry) -> Self {
        Self {
            path: &entry.path,
            kind: entry.kind.to_string(),
            size: entry.size,
            compressed_size: entry.compressed_size,
        }
    }
}

#[derive(Serialize)]
struct DigestOutput<'a> {
    algorithm: String,
    hex: &'a str,
    byte_len: u64,
    duration_ms: u128,
}

impl<'a> From<&'a DigestResult> for DigestOutput<'a> {
    fn from(digest: &'a DigestResult) -> Self {
        Self {
            algorithm: digest.algorithm.to_string(),
            hex: &digest.hex,
            byte_len: digest.byte_len,
            duration_ms: digest.duration.as_millis(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_creation_result(&self, metadata: &ArchiveMetadata) -> Result<()> {
        #[derive(Serialize)]
        struct CreationOutput<'a> {
            output_path: String,
            entry_count: usize,
            uncompressed_size: u64,
            compressed_size: u64,
            archive_size: u64,
            compression_ratio: f64,
            password_protected: bool,
            #[serde(skip_serializing_if = "Option::is_none")]
            digest: Option<DigestOutput<'a>>,
            duration_ms: u128,
            warnings: &'a [String],
        }

        let data = CreationOutput {
            output_path: metadata.output_path.display().to_string(),
            entry_count: metadata.entry_count,
            uncompressed_size: metadata.uncompressed_size,
            compressed_size: metadata.compressed_size,
            archive_size: metadata.archive_size,
            compression_ratio: metadata.compression_ratio,
            password_protected: metadata.password_protected,
            digest: metadata.digest.as_ref().map(DigestOutput::from),
            duration_ms: metadata.duration.as_millis(),
            warnings: &metadata.warnings,
        };

        Self::output(&JsonOutput::success("create", data))
    }

    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()> {
        #[derive(Serialize)]
        struct ExtractionOutput {
            output_dir: String,
            files_extracted: usize,
            directories_created: usize,
            bytes_written: u64,
            skipped: usize,
            duration_ms: u128,
            warnings: Vec<String>,
        }

        let data = ExtractionOutput {
            output_dir: report.output_dir.display().to_string(),
            files_extracted: report.files_extracted,
            directories_created: report.directories_created,
            bytes_written: report.bytes_written,
            skipped: report.skipped.len(),
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings(),
        };

        Self::output(&JsonOutput::success("extract", data))
    }

    fn format_listing_short(&self, listing: &Listing<'_>) -> Result<()> {
        self.format_listing_long(listing, false)
    }

    fn format_listing_long(&self, listing: &Listing<'_>, _human_readable: bool) -> Result<()> {
        #[derive(Serialize)]
        struct ListOutput<'a> {
            archive: String,
            password_protected: bool,
            total_entries: usize,
            entries: Vec<EntryOutput<'a>>,
        }

        let data = ListOutput {
            archive: listing.archive.display().to_string(),
            password_protected: listing.password_protected,
            total_entries: listing.entries.len(),
            entries: listing.entries.iter().map(EntryOutput::from).collect(),
        };

        Self::output(&JsonOutput::success("list", data))
    }

    fn format_digests(
        &self,
        file: &Path,
        digests: &[DigestResult],
        matched: Option<bool>,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct HashOutput<'a> {
            file: String,
            digests: Vec<DigestOutput<'a>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            matched: Option<bool>,
        }

        let data = HashOutput {
            file: file.display().to_string(),
            digests: digests.iter().map(DigestOutput::from).collect(),
            matched,
        };

        Self::output(&JsonOutput::success("hash", data))
    }

    fn format_check(
        &self,
        archive: &Path,
        password_required: bool,
        entries: usize,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct CheckOutput {
            archive: String,
            password_required: bool,
            total_entries: usize,
        }

        let data = CheckOutput {
            archive: archive.display().to_string(),
            password_required,
            total_entries: entries,
        };

        Self::output(&JsonOutput::success("check", data))
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::warning(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sealpack_core::EntryKind;

    #[test]
    fn test_entry_output_structure() {
        let entry = ArchiveEntry::directory("docs");
        let json = serde_json::to_string(&EntryOutput::from(&entry)).unwrap();
        assert!(json.contains("\"path\":\"docs\""));
        assert!(json.contains(&format!("\"kind\":\"{}\"", EntryKind::Directory)));
    }

    #[test]
    fn test_success_envelope() {
        let output = JsonOutput::success("check", 1);
        let json = serde_json::to_string(&output).unwrap();
        assert_eq!(json, r#"{"operation":"check","status":"success","data":1}"#);
    }
}
