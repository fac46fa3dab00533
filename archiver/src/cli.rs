//! Component K: the three-verb CLI surface (`compress` / `decompress` /
//! `metadata`), in the style of `rls_module`/`delta_module`'s `cli_parse.rs`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

pub const OUTPUT_EXT: &str = "dedal";

#[derive(Debug, Parser)]
#[command(
    name = "dedal",
    author,
    version,
    about = "Block-Huffman multi-file archiver",
    long_about = "Compresses one or more files (or a directory) into a single \
                  self-describing .dedal archive, and reconstructs them with \
                  SHA-256 verification.",
    after_help = "Run `dedal <subcommand> --help` for flags specific to that subcommand."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compress one or more files, or a directory, into a .dedal archive.
    #[command(alias = "c")]
    Compress {
        /// Input files or directories.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Block size in bytes (1-65536). Auto-computed from total input size
        /// when omitted.
        #[arg(long)]
        block: Option<usize>,

        /// Compression type. Only "huffman" is implemented.
        #[arg(long, default_value = "huffman")]
        r#type: String,

        /// Output archive path. Derived from the input name when omitted.
        #[arg(long)]
        dest: Option<PathBuf>,

        /// Suppress progress output.
        #[arg(long)]
        quiet: bool,
    },

    /// Decompress a .dedal archive.
    #[command(alias = "d")]
    Decompress {
        /// Archive to decompress.
        archive: PathBuf,

        /// Output directory. Defaults to the current directory.
        #[arg(long)]
        dest: Option<PathBuf>,

        /// Suppress progress output.
        #[arg(long)]
        quiet: bool,
    },

    /// Print the file table stored in a .dedal archive's footer.
    #[command(alias = "m")]
    Metadata { archive: PathBuf },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Clap(#[from] clap::Error),

    #[error("unsupported compression type {0:?}: only \"huffman\" is implemented")]
    UnsupportedType(String),

    #[error(transparent)]
    Container(#[from] container::ArchiveError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn parse_args() -> Result<CliArgs, CliError> {
    Ok(CliArgs::try_parse()?)
}

impl Commands {
    /// Flag-level validation that can't be expressed through clap alone.
    pub fn validate(&self) -> Result<(), CliError> {
        if let Commands::Compress { r#type, .. } = self {
            if r#type != "huffman" {
                return Err(CliError::UnsupportedType(r#type.clone()));
            }
        }
        Ok(())
    }
}
