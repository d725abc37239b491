//! Cymru CLI
//!
//! Command-line interface for the rugby organisation geocoding cache.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cymru_api::{ApiConfig, ApiServer};
use cymru_core::traits::SnapshotStore;
use cymru_core::types::{CacheMap, CacheStats};
use cymru_geocoder::Geocoder;
use cymru_store::JsonFileStore;

/// Cymru - geocoding cache for the Welsh rugby club directory
#[derive(Parser)]
#[command(name = "cymru")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Snapshot file (overrides GEOCODE_CACHE_FILE)
    #[arg(long, global = true)]
    cache_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Resolve organisation names through the cache
    Resolve {
        /// Organisation names
        names: Vec<String>,
        /// Read names from a file, one per line
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Maximum concurrent provider calls
        #[arg(short, long)]
        concurrency: Option<usize>,
        /// Google Maps API key (overrides GOOGLE_MAPS_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect or edit the snapshot file
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show entry counts
    Stats,
    /// Remove entries so they are looked up again by the next process
    Clear {
        /// Only remove negative entries
        #[arg(long)]
        negative_only: bool,
    },
    /// Print the snapshot as JSON
    Export,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "cymru=debug,info"
    } else {
        "cymru=info,warn"
    };

    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()));
    if cli.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let mut config = ApiConfig::from_env();
    if let Some(path) = cli.cache_file {
        config.geocoder.cache_file = path;
    }

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(config, port, &bind).await,
        Commands::Resolve {
            names,
            file,
            concurrency,
            api_key,
            json,
        } => {
            if let Some(limit) = concurrency {
                config.geocoder.concurrency = limit;
            }
            if api_key.is_some() {
                config.api_key = api_key;
            }
            cmd_resolve(config, names, file.as_deref(), json).await
        }
        Commands::Cache { action } => {
            let store = JsonFileStore::new(&config.geocoder.cache_file);
            match action {
                CacheAction::Stats => cmd_cache_stats(&store).await,
                CacheAction::Clear { negative_only } => cmd_cache_clear(&store, negative_only).await,
                CacheAction::Export => cmd_cache_export(&store).await,
            }
        }
    }
}

/// Run API server
async fn cmd_serve(config: ApiConfig, port: u16, bind: &str) -> Result<()> {
    println!("{}", "🏉 Starting Cymru geocode API...".cyan().bold());
    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    println!("   {} {}", "Cache file:".dimmed(), config.geocoder.cache_file.display());
    if config.api_key.is_none() {
        println!(
            "   {}",
            "⚠️  No Google Maps API key set; geocode requests will fail.".yellow()
        );
    }
    println!("\n   Press Ctrl+C to stop.\n");

    let server = ApiServer::new(config).context("Failed to configure server")?;

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    server.run(addr).await?;

    Ok(())
}

/// Resolve names through the cache
async fn cmd_resolve(
    config: ApiConfig,
    mut names: Vec<String>,
    file: Option<&Path>,
    json: bool,
) -> Result<()> {
    if let Some(path) = file {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read names from {}", path.display()))?;
        names.extend(read_names(&contents));
    }

    if names.is_empty() {
        bail!("No organisation names given (pass names or --file)");
    }

    let geocoder = Geocoder::google(config.geocoder, config.api_key)
        .context("Failed to configure geocoder")?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Locating {} organisations…", names.len()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let outcome = geocoder.resolve_batch(&names).await;
    pb.finish_and_clear();
    let outcome = outcome.context("Geocoding failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.results)?);
        return Ok(());
    }

    for (name, entry) in &outcome.results {
        match entry {
            Some(coord) => println!("   {} {} → {}", "✓".green(), name, coord),
            None => println!("   {} {} → {}", "✗".red(), name, "not found".dimmed()),
        }
    }

    let report = &outcome.report;
    println!(
        "\n{} {} requested, {} cached, {} fetched ({} found)",
        "📍".cyan(),
        report.requested,
        report.cached,
        report.fetched,
        report.found
    );

    Ok(())
}

/// Show snapshot statistics
async fn cmd_cache_stats(store: &JsonFileStore) -> Result<()> {
    let entries = load_snapshot(store).await?;
    let stats = CacheStats::from_entries(&entries);

    println!("{} {}", "🗂  Cache file:".cyan().bold(), store.path().display());
    println!("   {} {}", "Entries:".dimmed(), stats.total_entries);
    println!("   {} {}", "Located:".green(), stats.positive_entries);
    println!("   {} {}", "Not found:".yellow(), stats.negative_entries);

    Ok(())
}

/// Remove entries from the snapshot
async fn cmd_cache_clear(store: &JsonFileStore, negative_only: bool) -> Result<()> {
    let mut entries = load_snapshot(store).await?;
    let removed = clear_entries(&mut entries, negative_only);

    store
        .save(&entries)
        .await
        .with_context(|| format!("Failed to write {}", store.path().display()))?;
    info!(path = %store.path().display(), removed, negative_only, "Snapshot entries cleared");

    println!(
        "{} Removed {} entr{}, {} remaining",
        "✅".green(),
        removed,
        if removed == 1 { "y" } else { "ies" },
        entries.len()
    );
    Ok(())
}

/// Print the snapshot
async fn cmd_cache_export(store: &JsonFileStore) -> Result<()> {
    let entries = load_snapshot(store).await?;
    let sorted: std::collections::BTreeMap<_, _> = entries.iter().collect();
    println!("{}", serde_json::to_string_pretty(&sorted)?);
    Ok(())
}

async fn load_snapshot(store: &JsonFileStore) -> Result<CacheMap> {
    let entries = store
        .load()
        .await
        .with_context(|| format!("Failed to read {}", store.path().display()))?;
    Ok(entries.unwrap_or_default())
}

/// Drops entries from the map, returning how many were removed.
fn clear_entries(entries: &mut CacheMap, negative_only: bool) -> usize {
    let before = entries.len();
    if negative_only {
        entries.retain(|_, entry| entry.is_some());
    } else {
        entries.clear();
    }
    before - entries.len()
}

/// One name per line; blank lines and `#` comments are skipped.
fn read_names(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
