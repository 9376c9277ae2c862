//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use crate::prompt;
use anyhow::Result;
use sealpack_core::ArchiveReader;
use sealpack_core::ExtractOptions;
use sealpack_core::ExtractionLimits;

pub fn execute(
    args: &ExtractArgs,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let mut reader = add_archive_context(ArchiveReader::open(&args.archive), &args.archive)?;

    let limits = ExtractionLimits::default()
        .with_max_file_count(args.max_files)
        .with_max_total_size(args.max_total_size)
        .with_max_compression_ratio(args.max_ratio);

    let mut options = ExtractOptions::new()
        .with_limits(limits)
        .with_overwrite(args.force);
    if let Some(dir) = &args.output_dir {
        options = options.with_output_dir(dir.clone());
    }
    if let Some(password) = resolve_password(&reader, args, formatter)? {
        options = options.with_password(password);
    }

    let report = if show_progress {
        let mut progress = CliProgress::new("Extracting");
        add_archive_context(
            reader.extract_with_progress(&options, &mut progress),
            &args.archive,
        )?
    } else {
        add_archive_context(reader.extract(&options), &args.archive)?
    };

    formatter.format_extraction_result(&report)?;

    Ok(())
}

/// Picks the password to try: the flag, else a prompt on a terminal.
///
/// Without either the core reports `PasswordRequired`.
fn resolve_password(
    reader: &ArchiveReader,
    args: &ExtractArgs,
    formatter: &dyn OutputFormatter,
) -> Result<Option<String>> {
    if !reader.requires_password() {
        if args.password.is_some() {
            formatter.format_warning("archive is not password protected; --password ignored");
        }
        tracing::debug!(archive = %args.archive.display(), "no credential stored, skipping password");
        return Ok(None);
    }

    match &args.password {
        Some(password) => Ok(Some(password.clone())),
        None if prompt::is_interactive() => prompt::read_password("Password: ").map(Some),
        None => {
            tracing::debug!("stdin is not a terminal, not prompting for a password");
            Ok(None)
        }
    }
}
