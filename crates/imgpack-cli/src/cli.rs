//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "imgpack")]
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
    /// Extract the images of a ZIP archive
    Extract(ExtractArgs),
    /// List archive entries without decoding them
    List(ListArgs),
    /// Print the direct-download form of a sharing link
    Normalize(NormalizeArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

impl Commands {
    /// Operation name used in JSON output.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Extract(_) => "extract",
            Self::List(_) => "list",
            Self::Normalize(_) => "normalize",
            Self::Completion(_) => "completion",
        }
    }
}

/// Options shared by commands that read an archive.
#[derive(clap::Args)]
pub struct SourceArgs {
    /// Archive URL (http or https) or path to a local ZIP file
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Abort the download after this many seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Treat links on this host as sharing links (can be repeated)
    #[arg(long = "direct-host", value_name = "HOST")]
    pub direct_hosts: Vec<String>,
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write decoded images into this directory
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Overwrite existing files in the output directory
    #[arg(short, long, requires = "output_dir")]
    pub force: bool,

    /// Include the data URI of every image in the output
    #[arg(long)]
    pub include_data: bool,
}

#[derive(clap::Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(clap::Args)]
pub struct NormalizeArgs {
    /// URL to normalize
    #[arg(value_name = "URL")]
    pub url: String,

    /// Treat links on this host as sharing links (can be repeated)
    #[arg(long = "direct-host", value_name = "HOST")]
    pub direct_hosts: Vec<String>,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
