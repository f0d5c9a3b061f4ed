//! `tradeplan`: plan the fewest days needed to reach a set of resource
//! targets.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `planner-config.yaml`
//! 3. Build the catalog, adding battle paths from drop records if given
//! 4. Load extra character records if given
//! 5. Solve and render the report as text or JSON

mod error;
mod render;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tradeplan_catalog::load_drop_paths;
use tradeplan_core::{CharacterTable, PlannerConfig, catalog_for, run_plan};

use crate::error::CliError;
use crate::render::render_text;

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Human-readable tables.
    Text,
    /// The structured report as pretty JSON.
    Json,
}

/// Trade planner - fewest days from held resources to target resources
#[derive(Parser, Debug)]
#[command(name = "tradeplan")]
#[command(about = "Plan the cheapest sequence of trade paths that reaches a resource target")]
struct Args {
    /// Planner configuration file
    #[arg(long, short = 'c', default_value = "planner-config.yaml")]
    config: PathBuf,

    /// Extra character records, one JSON object per line
    #[arg(long)]
    characters: Option<PathBuf>,

    /// Stage drop statistics, one JSON object per line
    #[arg(long)]
    drops: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print the report instead of writing the configured output file
    #[arg(long)]
    stdout: bool,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration, input records or planning run
/// fail, or the report cannot be written.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let args = Args::parse();
    info!(config = %args.config.display(), "tradeplan starting");
    run(&args)?;
    Ok(())
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = PlannerConfig::from_file(&args.config)?;
    info!(
        sanity_per_day = config.settings.sanity_per_day,
        held = config.held_items.len(),
        targets = config.target_items.len(),
        plans = config.plans.len(),
        "configuration loaded"
    );

    let mut catalog = catalog_for(&config)?;
    if let Some(path) = &args.drops {
        let paths = load_drop_paths(open(path)?, &catalog.items)?;
        info!(path = %path.display(), stages = paths.len(), "drop records loaded");
        catalog.paths.extend(paths);
    }

    let mut characters = CharacterTable::with_builtin();
    if let Some(path) = &args.characters {
        let added = characters.load_records(open(path)?)?;
        info!(path = %path.display(), added, "character records loaded");
    }

    let outcome = run_plan(&config, catalog, &characters)?;
    let rendered = match args.format {
        Format::Text => render_text(&outcome.report)?,
        Format::Json => serde_json::to_string_pretty(&outcome.report)?,
    };

    if args.stdout {
        println!("{rendered}");
        return Ok(());
    }
    let output = config.output_path(&chrono::Local::now());
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(CliError::io(parent))?;
    }
    std::fs::write(&output, rendered).map_err(CliError::io(&output))?;
    info!(path = %output.display(), "report written");
    Ok(())
}

fn open(path: &Path) -> Result<BufReader<File>, CliError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(CliError::io(path))
}
