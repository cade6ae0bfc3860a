//! bibtab - BibTeX <-> table converter
//!
//! `bibtab to-table refs.bib` writes a tab-separated table for spreadsheet
//! editing; `bibtab to-bib refs.tsv --tex refs.tex` turns it back into
//! BibTeX plus a LaTeX fragment citing every entry.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bibtab", version, about)]
struct Cli {
    /// Config file (default: <config dir>/bibtab/config.toml if present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a BibTeX file to a table
    ToTable(ToTableArgs),
    /// Convert a table to a BibTeX file
    ToBib(ToBibArgs),
}

/// Table format overrides shared by both directions
#[derive(Args, Debug, Clone, Default)]
pub struct FormatArgs {
    /// Cell delimiter (default: tab)
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Quote character (default: ')
    #[arg(long, value_name = "CHAR")]
    pub quote: Option<char>,
}

#[derive(Args, Debug)]
pub struct ToTableArgs {
    /// Path to the input BibTeX file
    pub input: PathBuf,

    /// Path to the output table
    #[arg(short, long, default_value = "refs.tsv")]
    pub output: PathBuf,

    /// Rename keys using first author surname and year
    #[arg(short, long, value_name = "BOOL")]
    pub rename_keys: Option<bool>,

    /// Sort rows by entry key
    #[arg(long)]
    pub sort: bool,

    #[command(flatten)]
    pub format: FormatArgs,

    /// Write warnings as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ToBibArgs {
    /// Path to the input table
    pub input: PathBuf,

    /// Path to the output BibTeX file
    #[arg(short, long, default_value = "refs.bib")]
    pub output: PathBuf,

    /// Also write a LaTeX fragment citing every entry
    #[arg(long, value_name = "PATH")]
    pub tex: Option<PathBuf>,

    /// Log the \nocite list
    #[arg(long)]
    pub print_cites: bool,

    #[command(flatten)]
    pub format: FormatArgs,

    /// Write warnings as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::ToTable(args) => commands::to_table(args, cli.config.as_deref()),
        Command::ToBib(args) => commands::to_bib(args, cli.config.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
