//! Crime dashboard over an incident-level CSV and a per-area aggregate CSV.
//!
//! Loading normalizes both tables' column names, resolves the semantic
//! fields each stage needs from ordered candidate lists, derives time fields,
//! and builds a per-area summary. [`view::render`] then turns one area
//! selection into every dashboard artifact.

pub mod cli;
pub mod config;
pub mod data;
pub mod dataset;
pub mod frame;
pub mod frequency;
pub mod incident;
pub mod io_utils;
pub mod report;
pub mod resolve;
pub mod summary;
pub mod table;
pub mod view;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug, info, warn};

use crate::{
    cli::{Cli, Commands, DataArgs, OutputFormat, SummaryArgs, ViewArgs},
    config::DashboardConfig,
    dataset::{Dataset, LoadOptions},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("crime_dashboard", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Areas(args) => handle_areas(&args),
        Commands::Summary(args) => handle_summary(&args),
        Commands::View(args) => handle_view(&args),
    }
}

fn load(args: &DataArgs) -> Result<(Dataset, DashboardConfig)> {
    let config = DashboardConfig::load_or_default(args.config.as_deref())?;
    let options = LoadOptions {
        delimiter: args.delimiter,
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
    };
    info!(
        "Loading detail '{}' and aggregate '{}'",
        args.detail.display(),
        args.aggregate.display()
    );
    let dataset = Dataset::load(&args.detail, &args.aggregate, options, &config.fields);
    Ok((dataset, config))
}

fn handle_areas(args: &DataArgs) -> Result<()> {
    let (dataset, _) = load(args)?;
    let areas = dataset.areas();
    if areas.is_empty() {
        warn!("No areas available");
    }
    for area in &areas {
        println!("{area}");
    }
    Ok(())
}

fn handle_summary(args: &SummaryArgs) -> Result<()> {
    let (dataset, _) = load(&args.data)?;
    match &args.output {
        Some(path) => {
            report::write_summary_csv(&dataset.summary, path)?;
            info!(
                "Summary for {} row(s) written to {:?}",
                dataset.summary.len(),
                path
            );
        }
        None => print!("{}", report::render_summary(&dataset.summary)),
    }
    Ok(())
}

fn handle_view(args: &ViewArgs) -> Result<()> {
    let (dataset, mut config) = load(&args.data)?;
    if let Some(rows) = args.rows {
        config.max_table_rows = rows;
    }
    let selection = match args.area.as_deref() {
        _ if args.all => None,
        Some(area) if area.trim().is_empty() => None,
        Some(area) => Some(resolve::clean_area_name(area)),
        None => dataset.default_area(),
    };
    debug!("Rendering view for {selection:?}");
    let view = view::render(
        selection.as_deref(),
        &dataset.incidents,
        &dataset.summary,
        &config,
    );
    match args.format {
        OutputFormat::Table => print!("{}", report::render_text(&view)),
        OutputFormat::Json => println!("{}", report::render_json(&view)?),
    }
    Ok(())
}
