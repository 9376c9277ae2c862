//! Check command implementation

use crate::cli::CheckArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use sealpack_core::ArchiveReader;

pub fn execute(args: &CheckArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let reader = add_archive_context(ArchiveReader::open(&args.archive), &args.archive)?;
    formatter.format_check(&args.archive, reader.requires_password(), reader.len())
}
