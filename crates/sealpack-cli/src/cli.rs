//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use sealpack_core::HashAlgorithm;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sealpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a ZIP archive from a file or directory
    Create(CreateArgs),
    /// Extract archive contents
    Extract(ExtractArgs),
    /// List archive contents without extraction
    List(ListArgs),
    /// Compute or verify file digests
    Hash(HashArgs),
    /// Report whether an archive requires a password
    Check(CheckArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct CreateArgs {
    /// Source file or directory
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Output archive path (default: <SOURCE name>.zip in the current directory)
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Compression level (1-9)
    #[arg(
        short = 'l',
        long,
        default_value = "9",
        value_parser = clap::value_parser!(u8).range(1..=9)
    )]
    pub compression_level: u8,

    /// Protect extraction with a password
    #[arg(short, long, value_name = "PASSWORD", conflicts_with = "prompt_password")]
    pub password: Option<String>,

    /// Read the password from the terminal
    #[arg(long)]
    pub prompt_password: bool,

    /// Key stretching work factor for the stored credential
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..=64))]
    pub iterations: Option<u32>,

    /// Digest of the finished archive to report
    #[arg(long = "hash", value_name = "ALG", value_parser = parse_algorithm)]
    pub hash: Option<HashAlgorithm>,

    /// Exclude pattern (name, *.ext or prefix*; can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Leave out files and directories whose names start with '.'
    #[arg(long)]
    pub no_hidden: bool,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Overwrite output file if exists
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Output directory (default: the archive's directory)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Password for a protected archive
    #[arg(short, long, value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Maximum number of entries to extract
    #[arg(long, value_name = "COUNT")]
    pub max_files: Option<usize>,

    /// Maximum total extracted size in bytes (K, M, G, T suffixes allowed)
    #[arg(long, value_parser = parse_byte_size)]
    pub max_total_size: Option<u64>,

    /// Maximum per-entry compression ratio
    #[arg(long, value_name = "RATIO", value_parser = parse_ratio)]
    pub max_ratio: Option<f64>,

    /// Overwrite files that already exist in the output directory
    #[arg(short, long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Show detailed entry information
    #[arg(short, long)]
    pub long: bool,

    /// Show sizes in human-readable format
    #[arg(short = 'H', long)]
    pub human_readable: bool,
}

#[derive(clap::Args)]
pub struct HashArgs {
    /// File to digest
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Digest algorithm (sha256, sha384, sha512, blake3; can be repeated)
    #[arg(
        short,
        long = "algorithm",
        value_name = "ALG",
        default_value = "sha256",
        value_parser = parse_algorithm
    )]
    pub algorithms: Vec<HashAlgorithm>,

    /// Expected hex digest; fails unless one computed digest matches
    #[arg(long, value_name = "HEX")]
    pub expect: Option<String>,
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

fn parse_algorithm(s: &str) -> Result<HashAlgorithm, String> {
    s.parse::<HashAlgorithm>().map_err(|e| e.to_string())
}

fn parse_ratio(s: &str) -> Result<f64, String> {
    match s.trim().parse::<f64>() {
        Ok(ratio) if ratio.is_finite() && ratio >= 1.0 => Ok(ratio),
        _ => Err(format!("invalid ratio: {s} (expected a number >= 1)")),
    }
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_byte_size() {
        assert_eq!(parse_byte_size("100").unwrap(), 100);
        assert_eq!(parse_byte_size("1K").unwrap(), 1024);
        assert_eq!(parse_byte_size("2M").unwrap(), 2 * 1024 * 1024);
        assert_eq!(parse_byte_size("3G").unwrap(), 3 * 1024 * 1024 * 1024);
        assert_eq!(parse_byte_size("1T").unwrap(), 1024_u64.pow(4));
        assert!(parse_byte_size("invalid").is_err());
        assert!(parse_byte_size("").is_err());
    }

    #[test]
    fn test_parse_byte_size_overflow() {
        assert!(parse_byte_size("18446744073709551615K").is_err());
        assert!(parse_byte_size("17592186044416G").is_err());
    }

    #[test]
    fn test_parse_ratio() {
        assert!((parse_ratio("100").unwrap() - 100.0).abs() < f64::EPSILON);
        assert!(parse_ratio("0.5").is_err());
        assert!(parse_ratio("NaN").is_err());
        assert!(parse_ratio("inf").is_err());
        assert!(parse_ratio("lots").is_err());
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!(parse_algorithm("SHA-256").unwrap(), HashAlgorithm::Sha256);
        assert_eq!(parse_algorithm("blake3").unwrap(), HashAlgorithm::Blake3);
        assert!(parse_algorithm("md5").unwrap_err().contains("md5"));
    }

    #[test]
    fn test_create_defaults() {
        let cli = Cli::try_parse_from(["sealpack", "create", "src"]).unwrap();
        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.compression_level, 9);
        assert!(args.password.is_none());
        assert!(args.output.is_none());
    }

    #[test]
    fn test_password_flags_conflict() {
        let result = Cli::try_parse_from([
            "sealpack",
            "create",
            "src",
            "--password",
            "x",
            "--prompt-password",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_level_out_of_range() {
        assert!(Cli::try_parse_from(["sealpack", "create", "src", "-l", "0"]).is_err());
        assert!(Cli::try_parse_from(["sealpack", "create", "src", "-l", "10"]).is_err());
    }
}
