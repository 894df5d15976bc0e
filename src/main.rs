//! standings-sync - regional standings collector
//!
//! A CLI tool that finds the newest published standings snapshot for each
//! region in a GitHub repository, parses the markdown tables and writes a
//! single JSON document.
//!
//! Exit codes:
//!   0 - Success (regions without a snapshot are reported but not fatal)
//!   1 - Runtime error (config, discovery failure, write failure, etc.)

mod cli;
mod collect;
mod config;
mod error;
mod models;
mod output;
mod parser;
mod remote;
mod resolve;

use anyhow::{Context, Result};
use cli::Args;
use collect::{Aggregator, RegionOutcome};
use config::{Config, DEFAULT_CONFIG_FILE};
use remote::GithubSource;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("standings-sync v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .standings-sync.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to change the repository, regions or output path.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// `RUST_LOG` takes precedence over the verbosity flags when set.
fn init_logging(args: &Args) {
    let level = args.log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Collect all regions and write the rankings document.
async fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    let source = GithubSource::new(&config.source)?;
    let aggregator =
        Aggregator::new(&source, &config).with_progress(!args.quiet && !args.dry_run);

    println!(
        "📥 Reading standings from {}/{}",
        config.source.repository, config.source.standings_dir
    );

    if args.dry_run {
        return handle_dry_run(&aggregator).await;
    }

    let collection = aggregator
        .collect()
        .await
        .context("Failed to discover standings snapshots")?;

    for report in &collection.regions {
        let region = &report.region;
        match &report.outcome {
            RegionOutcome::Loaded { file, entries } => {
                println!("   ✔ {}: {} teams ({})", region.key, entries, file.name);
            }
            RegionOutcome::NotFound => {
                println!(
                    "   ✖ No file found for {} ({}) in {}",
                    region.key, region.name, collection.year
                );
            }
            RegionOutcome::FetchFailed { reason } => {
                println!("   ✖ Failed to fetch {}: {}", region.key, reason);
            }
        }
    }

    let output_path = Path::new(&config.output.path);
    output::write_rankings(&collection.rankings, output_path)
        .with_context(|| format!("Failed to write rankings to {}", output_path.display()))?;

    let unavailable = collection.unavailable().count();
    if unavailable > 0 {
        warn!("{} region(s) had no data", unavailable);
    }

    println!(
        "\n✅ Written {} ({} entries, {:.1}s)",
        output_path.display(),
        collection.rankings.total_entries(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Handle --dry-run: resolve every region's snapshot, print it, exit.
async fn handle_dry_run(aggregator: &Aggregator<'_, GithubSource>) -> Result<()> {
    println!("\n🔍 Dry run: resolving snapshots (nothing is downloaded or written)...\n");

    let (year, plans) = aggregator
        .plan()
        .await
        .context("Failed to discover standings snapshots")?;

    println!("   Year: {}\n", year);
    for plan in &plans {
        match &plan.snapshot {
            Some(snapshot) => println!("     📄 {}: {}", plan.region.key, snapshot.url),
            None => println!(
                "     ✖ {}: no file for '{}'",
                plan.region.key, plan.region.name
            ),
        }
    }

    println!("\n✅ Dry run complete.");
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
