use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Area-filtered crime dashboard over detail and aggregate CSV files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the selectable areas in sorted order
    Areas(DataArgs),
    /// Print or export the per-area summary table
    Summary(SummaryArgs),
    /// Render the dashboard for one area
    View(ViewArgs),
}

#[derive(Debug, Args)]
pub struct DataArgs {
    /// Incident-level detail CSV
    #[arg(short = 'd', long = "detail")]
    pub detail: PathBuf,
    /// Per-area aggregate CSV
    #[arg(short = 'a', long = "aggregate")]
    pub aggregate: PathBuf,
    /// Optional YAML file overriding column candidates and display limits
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of both input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub data: DataArgs,
    /// Write the summary as CSV instead of printing a table
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ViewArgs {
    #[command(flatten)]
    pub data: DataArgs,
    /// Area to focus on (defaults to the first area in sorted order)
    #[arg(long = "area")]
    pub area: Option<String>,
    /// Show every area instead of defaulting to the first one
    #[arg(long = "all", conflicts_with = "area")]
    pub all: bool,
    /// Output format
    #[arg(long = "format", default_value = "table")]
    pub format: OutputFormat,
    /// Cap on record-table rows (overrides the config file)
    #[arg(long = "rows")]
    pub rows: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\\t" => Ok(b'\t'),
        "comma" => Ok(b','),
        "semicolon" => Ok(b';'),
        "pipe" => Ok(b'|'),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c as u8),
                _ => Err(format!(
                    "Delimiter '{other}' must be a single ASCII character or one of tab/comma/semicolon/pipe"
                )),
            }
        }
    }
}
