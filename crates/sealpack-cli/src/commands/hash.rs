//! Hash command implementation

use crate::cli::HashArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::DigestBar;
use anyhow::Result;
use anyhow::bail;
use sealpack_core::ArchiveError;
use sealpack_core::HashEngine;

pub fn execute(args: &HashArgs, formatter: &dyn OutputFormatter, show_progress: bool) -> Result<()> {
    let engine = HashEngine::new();
    let mut digests = Vec::with_capacity(args.algorithms.len());

    for &algorithm in &args.algorithms {
        let result = if show_progress {
            let bar = DigestBar::new(&format!("Hashing ({algorithm})"));
            let mut on_progress = |percent: u8| bar.update(percent);
            engine.digest_file(&args.file, algorithm, Some(&mut on_progress))
        } else {
            engine.digest_file(&args.file, algorithm, None)
        };
        digests.push(add_archive_context(
            result.map_err(ArchiveError::from),
            &args.file,
        )?);
    }

    let matched = args
        .expect
        .as_deref()
        .map(|expected| digests.iter().any(|digest| digest.matches(expected)));

    formatter.format_digests(&args.file, &digests, matched)?;

    if matched == Some(false) {
        bail!(
            "Digest mismatch for '{}'\n\
             HINT: The file differs from the expected content, or a different algorithm was used.",
            args.file.display()
        );
    }

    Ok(())
}
