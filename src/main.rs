//! ATC-Harvest main entry point
//!
//! Command-line interface for harvesting the hierarchical code index into
//! two CSV tables.

use anyhow::Context;
use atc_harvest::cache::FsCacheStore;
use atc_harvest::config::{load_config, validate, CrawlConfig};
use atc_harvest::crawler::crawl;
use atc_harvest::model::code_level;
use atc_harvest::output::write_tables;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Harvest the ATC/DDD classification index into two CSV tables
///
/// Walks the code hierarchy breadth-first from the given roots (or the 14
/// top-level anatomical groups), rate-limiting and caching every request,
/// and writes a code registry and a dose registry.
#[derive(Parser, Debug)]
#[command(name = "atc-harvest")]
#[command(version)]
#[command(about = "Harvest a hierarchical code index into flat CSV tables", long_about = None)]
struct Cli {
    /// Root codes to start from (defaults to the 14 top-level groups)
    #[arg(value_name = "ROOT")]
    roots: Vec<String>,

    /// Path to an optional TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Minimum delay between network requests, in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Stop after this many codes have been processed
    #[arg(long, value_name = "N")]
    max_codes: Option<usize>,

    /// Per-request HTTP timeout, in seconds
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Attempts per URL before a fetch counts as failed
    #[arg(long, value_name = "N")]
    max_attempts: Option<u32>,

    /// Directory for the raw-response cache
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Directory the CSV tables are written to
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Validate the configuration and show the plan without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    validate(&config).context("invalid configuration")?;

    if cli.dry_run {
        print_plan(&config);
        return Ok(());
    }

    let cache = FsCacheStore::new(&config.cache_dir)
        .with_context(|| format!("failed to open cache at {}", config.cache_dir.display()))?;

    tracing::info!(
        "Starting harvest: {} roots, {}ms delay, ceiling {}",
        config.roots.len(),
        config.delay_ms,
        config
            .max_codes
            .map(|n| n.to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    let harvest = crawl(&config, Box::new(cache)).await?;

    tracing::info!(
        "Harvested {} codes and {} dose rows",
        harvest.codes.len(),
        harvest.doses.len()
    );

    write_tables(&harvest, &config.out_dir)
        .with_context(|| format!("failed to write tables to {}", config.out_dir.display()))?;

    println!(
        "Wrote {} codes and {} dose rows to {}",
        harvest.codes.len(),
        harvest.doses.len(),
        config.out_dir.display()
    );

    Ok(())
}

/// Merges the optional config file with CLI overrides
fn build_config(cli: &Cli) -> anyhow::Result<CrawlConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => CrawlConfig::default(),
    };

    if !cli.roots.is_empty() {
        config.roots = cli.roots.clone();
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.delay_ms = delay_ms;
    }
    if let Some(max_codes) = cli.max_codes {
        config.max_codes = Some(max_codes);
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.max_attempts = max_attempts;
    }
    if let Some(cache_dir) = &cli.cache_dir {
        config.cache_dir = cache_dir.clone();
    }
    if let Some(out_dir) = &cli.out_dir {
        config.out_dir = out_dir.clone();
    }

    Ok(config)
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("atc_harvest=info,warn"),
            1 => EnvFilter::new("atc_harvest=debug,info"),
            2 => EnvFilter::new("atc_harvest=trace,debug"),
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

/// Handles --dry-run: shows what would be crawled without any network activity
fn print_plan(config: &CrawlConfig) {
    println!("=== ATC-Harvest Dry Run ===\n");

    println!("Endpoint: {}", config.base_url);
    println!("Delay: {}ms between requests", config.delay_ms);
    println!("Timeout: {}s per request", config.timeout_secs);
    println!("Attempts: {} per URL", config.max_attempts);
    match config.max_codes {
        Some(max) => println!("Ceiling: {} codes", max),
        None => println!("Ceiling: none"),
    }
    println!("Cache: {}", config.cache_dir.display());
    println!("Output: {}", config.out_dir.display());

    println!("\nRoots ({}):", config.roots.len());
    for root in &config.roots {
        match code_level(root) {
            Some(level) => println!("  - {} (level {})", root, level),
            None => println!("  - {} (irregular length)", root),
        }
    }

    println!("\n✓ Configuration is valid");
}
