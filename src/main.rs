//! ESG Harvest main entry point
//!
//! This is the command-line interface for the ESG score harvester.

use anyhow::Context;
use clap::Parser;
use esg_harvest::config::{load_config_with_hash, Config};
use esg_harvest::harvest::{run_harvest, PoolOptions};
use esg_harvest::output::{print_statistics, write_results};
use esg_harvest::universe::{CountryTable, Universe};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// ESG Harvest: a concurrent ESG score scraper
///
/// Fetches the ESG score page of every identifier in the universe with a
/// pool of concurrent workers and writes one flat record per identifier
/// to a JSON file.
#[derive(Parser, Debug)]
#[command(name = "esg-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent ESG score scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and input data and show what would be harvested
    #[arg(long)]
    dry_run: bool,

    /// Write results here instead of the configured results path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).context(format!("invalid config {}", cli.config.display()));
        }
    };

    // Input data must be valid before any worker starts
    let universe = Universe::load(Path::new(&config.input.tickers_path))
        .context("loading identifier universe")?;
    let countries = CountryTable::load(Path::new(&config.input.countries_path))
        .context("loading country table")?;

    if cli.dry_run {
        handle_dry_run(&config, &universe, &countries)?;
    } else {
        let output = cli
            .output
            .unwrap_or_else(|| PathBuf::from(&config.output.results_path));
        handle_harvest(&config, &universe, countries, &output, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("esg_harvest=info,warn"),
            1 => EnvFilter::new("esg_harvest=debug,info"),
            2 => EnvFilter::new("esg_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be harvested
fn handle_dry_run(
    config: &Config,
    universe: &Universe,
    countries: &CountryTable,
) -> anyhow::Result<()> {
    let options = PoolOptions::from_config(&config.harvester)?;

    println!("=== ESG Harvest Dry Run ===\n");

    println!("Harvester Configuration:");
    println!("  Base URL: {}", config.harvester.base_url);
    println!("  Workers: {}", options.workers());
    println!("  Threads per worker: {}", options.threads_per_worker());
    println!("  Total concurrent fetches: {}", options.total_units());
    println!(
        "  Request timeout: {}s",
        config.harvester.request_timeout_secs
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nInput:");
    println!(
        "  Tickers: {} ({} identifiers)",
        config.input.tickers_path,
        universe.len()
    );
    println!(
        "  Countries: {} ({} entries)",
        config.input.countries_path,
        countries.len()
    );

    println!("\nOutput:");
    println!("  Results: {}", config.output.results_path);

    println!("\n✓ Configuration is valid");
    println!("✓ Would harvest {} identifiers", universe.len());

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(
    config: &Config,
    universe: &Universe,
    countries: CountryTable,
    output: &Path,
    quiet: bool,
) -> anyhow::Result<()> {
    tracing::info!("Harvest run started");

    let report = match run_harvest(config, universe, countries).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    write_results(&report.records, output)
        .with_context(|| format!("writing results to {}", output.display()))?;

    if !quiet {
        print_statistics(&report.stats);
    }

    Ok(())
}
