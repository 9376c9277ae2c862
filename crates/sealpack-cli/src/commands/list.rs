//! List command implementation

use crate::cli::ListArgs;
use crate::error::add_archive_context;
use crate::output::Listing;
use crate::output::OutputFormatter;
use anyhow::Result;
use sealpack_core::ArchiveReader;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    // Listing never needs the password.
    let mut reader = add_archive_context(ArchiveReader::open(&args.archive), &args.archive)?;
    let entries = add_archive_context(reader.entries(), &args.archive)?;

    let listing = Listing {
        archive: &args.archive,
        password_protected: reader.requires_password(),
        entries: &entries,
    };

    if args.long {
        formatter.format_listing_long(&listing, args.human_readable)?;
    } else {
        formatter.format_listing_short(&listing)?;
    }

    Ok(())
}
