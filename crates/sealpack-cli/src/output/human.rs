//! Human-readable output formatter with colors and styling.

use super::formatter::Listing;
use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use sealpack_core::ArchiveMetadata;
use sealpack_core::DigestResult;
use sealpack_core::EntryKind;
use sealpack_core::ExtractionReport;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn write_header(&self, text: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {text}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(text);
        }
    }

    fn write_warnings(&self, warnings: &[String]) {
        if warnings.is_empty() {
            return;
        }
        let _ = self.term.write_line("");
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{}", style("Warnings:").yellow().bold()));
        } else {
            let _ = self.term.write_line("Warnings:");
        }
        for warning in warnings {
            let _ = self.term.write_line(&format!("  - {warning}"));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_creation_result(&self, metadata: &ArchiveMetadata) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.write_header(&format!(
            "Archive created: {}",
            metadata.output_path.display()
        ));

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "  Entries:          {}",
            Self::format_number(metadata.entry_count)
        ));
        let _ = self.term.write_line(&format!(
            "  Total size:       {}",
            Self::format_size(metadata.uncompressed_size)
        ));
        let _ = self.term.write_line(&format!(
            "  Compressed size:  {}",
            Self::format_size(metadata.compressed_size)
        ));
        let _ = self.term.write_line(&format!(
            "  Compression:      {:.1}%",
            metadata.compression_ratio
        ));
        let _ = self.term.write_line(&format!(
            "  Password:         {}",
            if metadata.password_protected {
                "required to extract"
            } else {
                "none"
            }
        ));

        if let Some(digest) = &metadata.digest {
            let _ = self
                .term
                .write_line(&format!("  {:<17} {}", format!("{}:", digest.algorithm), digest.hex));
        }

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Archive size:     {}",
                Self::format_size(metadata.archive_size)
            ));
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", metadata.duration));
        }

        self.write_warnings(&metadata.warnings);
        Ok(())
    }

    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.write_header("Extraction complete");

        let _ = self
            .term
            .write_line(&format!("  Output: {}", report.output_dir.display()));
        let _ = self
            .term
            .write_line(&format!("  Files extracted: {}", report.files_extracted));
        let _ = self
            .term
            .write_line(&format!("  Directories: {}", report.directories_created));
        let _ = self.term.write_line(&format!(
            "  Total size: {}",
            Self::format_size(report.bytes_written)
        ));
        if !report.skipped.is_empty() {
            let _ = self
                .term
                .write_line(&format!("  Entries skipped: {}", report.skipped.len()));
        }

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Duration: {:?}", report.duration));
        }

        self.write_warnings(&report.warnings());
        Ok(())
    }

    fn format_listing_short(&self, listing: &Listing<'_>) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in listing.entries {
            let _ = self.term.write_line(&entry.stored_name());
        }

        Ok(())
    }

    fn format_listing_long(&self, listing: &Listing<'_>, human_readable: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let size_of = |bytes: u64| {
            if human_readable {
                Self::format_size(bytes)
            } else {
                bytes.to_string()
            }
        };

        for entry in listing.entries {
            let type_char = match entry.kind {
                EntryKind::File => "-",
                EntryKind::Directory => "d",
                EntryKind::Symlink => "l",
            };

            let _ = self.term.write_line(&format!(
                "{type_char} {:>10} {:>10}  {}",
                size_of(entry.size),
                size_of(entry.compressed_size),
                entry.stored_name()
            ));
        }

        let total: u64 = listing.entries.iter().map(|entry| entry.size).sum();
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "Total: {} entries, {}",
            Self::format_number(listing.entries.len()),
            Self::format_size(total)
        ));
        if listing.password_protected {
            let _ = self.term.write_line("Password required to extract");
        }

        Ok(())
    }

    fn format_digests(
        &self,
        file: &Path,
        digests: &[DigestResult],
        matched: Option<bool>,
    ) -> Result<()> {
        // A failed match is reported through the error path, not here.
        if self.quiet {
            return Ok(());
        }

        for digest in digests {
            let _ = self.term.write_line(&format!(
                "{}  {}  ({})",
                digest.hex,
                file.display(),
                digest.algorithm
            ));
            if self.verbose {
                let _ = self.term.write_line(&format!(
                    "  {} in {:?}",
                    Self::format_size(digest.byte_len),
                    digest.duration
                ));
            }
        }

        if matched == Some(true) {
            self.write_header("Digest matches");
        }

        Ok(())
    }

    fn format_check(
        &self,
        archive: &Path,
        password_required: bool,
        entries: usize,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let status = if password_required {
            "password required"
        } else {
            "no password"
        };
        let _ = self.term.write_line(&format!(
            "{}: {status} ({} entries)",
            archive.display(),
            Self::format_number(entries)
        ));

        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = term.write_line(&format!("WARNING: {message}"));
        }
    }
}
