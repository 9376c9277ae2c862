//! Create command implementation.

use crate::cli::CreateArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use crate::progress::DigestBar;
use crate::prompt;
use anyhow::Result;
use anyhow::bail;
use sealpack_core::CreateOptions;
use sealpack_core::create_archive;
use sealpack_core::create_archive_with_progress;
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;

pub fn execute(
    args: &CreateArgs,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.source));

    if output.exists() && !args.force {
        bail!(
            "Output file '{}' already exists\n\
             HINT: Use --force to overwrite it.",
            output.display()
        );
    }

    let password = if args.prompt_password {
        Some(prompt::read_new_password()?)
    } else {
        args.password.clone()
    };

    let options = build_options(args, password);
    tracing::debug!(
        source = %args.source.display(),
        output = %output.display(),
        protected = options.password.is_some(),
        "creating archive"
    );

    let metadata = if show_progress {
        let mut progress = CliProgress::new("Creating");
        let mut digest_bar: Option<DigestBar> = None;
        let mut on_digest = |percent: u8| {
            digest_bar
                .get_or_insert_with(|| DigestBar::new("Hashing"))
                .update(percent);
        };
        add_archive_context(
            create_archive_with_progress(
                &args.source,
                &output,
                &options,
                &mut progress,
                Some(&mut on_digest),
            ),
            &args.source,
        )?
    } else {
        add_archive_context(create_archive(&args.source, &output, &options), &args.source)?
    };

    formatter.format_creation_result(&metadata)
}

fn build_options(args: &CreateArgs, password: Option<String>) -> CreateOptions {
    let mut options = CreateOptions::default()
        .with_compression_level(args.compression_level)
        .with_hash_algorithm(args.hash)
        .with_exclude_patterns(args.exclude.clone())
        .with_include_hidden(!args.no_hidden)
        .with_follow_symlinks(args.follow_symlinks);

    if let Some(password) = password {
        options = options.with_password(password);
    }
    if let Some(iterations) = args.iterations {
        options = options.with_iterations(iterations);
    }
    options
}

/// `<source name>.zip` in the current directory.
fn default_output(source: &Path) -> PathBuf {
    let mut name: OsString = source
        .canonicalize()
        .ok()
        .and_then(|resolved| resolved.file_name().map(ToOwned::to_owned))
        .unwrap_or_else(|| OsString::from("archive"));
    name.push(".zip");
    PathBuf::from(name)
}
