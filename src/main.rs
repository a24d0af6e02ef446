//! neopen command line.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};

use neopen::PageChangePolicy;

#[derive(Parser)]
#[command(name = "neopen")]
#[command(version)]
#[command(about = "Extract handwritten strokes from smartpen storage dumps")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode pen files and print their pages as JSON
    Extract(ExtractArgs),
    /// List supported format versions and their scale tables
    Formats,
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Pen storage files, read in storage order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// TOML file with extraction settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Combine pages with the same identity
    #[arg(long)]
    merge_pages: bool,

    /// Fail a file when ink appears before any page information
    #[arg(long)]
    require_page_context: bool,

    /// Force a format version (0 for headerless legacy files)
    #[arg(long, value_name = "N")]
    format_version: Option<u8>,

    /// What to do with a stroke that is open when the page changes
    #[arg(long, value_enum)]
    page_change: Option<PageChangeArg>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum PageChangeArg {
    Seal,
    Split,
}

impl From<PageChangeArg> for PageChangePolicy {
    fn from(arg: PageChangeArg) -> Self {
        match arg {
            PageChangeArg::Seal => PageChangePolicy::Seal,
            PageChangeArg::Split => PageChangePolicy::Split,
        }
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract(args) => commands::extract::handle(args),
        Commands::Formats => {
            commands::formats::handle()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
