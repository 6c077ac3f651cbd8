//! Fare aggregator command line.
//!
//! Builds the configuration once and hands it to the library.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fare_aggregate::{Aggregator, PriceFilter};
use fare_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fare", about = "Consolidate captured flight fares")]
struct Cli {
    /// JSON configuration file; defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge every run's result file into the public table.
    Aggregate {
        /// Root of the run directory tree.
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Copy a table keeping only rows at or below a price.
    Filter {
        /// Table to filter.
        input: PathBuf,
        /// Maximum price, e.g. "400" or "R$ 1.200,00".
        max_price: String,
        /// Directory for the filtered copy.
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(Config::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Aggregate { root } => {
            if let Some(root) = root {
                config.aggregate.root = root;
            }
            let summary = Aggregator::new(config.aggregate)
                .run()
                .await
                .context("aggregation failed")?;
            tracing::info!(rows = summary.records, output = %summary.output.display(), "OK");
        }
        Commands::Filter {
            input,
            max_price,
            out_dir,
        } => {
            if let Some(dir) = out_dir {
                config.filter.output_dir = dir;
            }
            let summary = PriceFilter::new(config.filter)
                .apply(&input, &max_price)
                .await
                .with_context(|| format!("filtering {}", input.display()))?;
            tracing::info!(rows = summary.kept, output = %summary.output.display(), "OK");
        }
    }
    Ok(())
}
