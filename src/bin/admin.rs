//! CLI administration tool for tmdb-proxy.
//!
//! Inspects and maintains the local file cache and checks configuration
//! without starting the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Show entry count and disk usage of the file cache
//! cargo run --bin admin -- cache stats
//!
//! # List the stored cache keys
//! cargo run --bin admin -- cache keys
//!
//! # Remove expired and corrupt entries
//! cargo run --bin admin -- cache sweep
//!
//! # Validate configuration and show which backend would be used
//! cargo run --bin admin -- config check
//! ```
//!
//! # Environment Variables
//!
//! - `CACHE_DIR` (default `cache`): file cache directory
//! - `CACHE_TTL_SECONDS` (default 86400): entry lifetime used by `sweep`
//! - Everything read by the server, for `config check`

use tmdb_proxy::config::{self, CacheBackendConfig, mask_connection_string};
use tmdb_proxy::infrastructure::cache::FileCache;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;

/// CLI tool for managing tmdb-proxy.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect or maintain the file cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Configuration tools
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// File cache subcommands.
#[derive(Subcommand)]
enum CacheAction {
    /// Show entry count and total size
    Stats,

    /// List the cache keys stored on disk
    Keys,

    /// Remove expired and corrupt entries
    Sweep {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Configuration subcommands.
#[derive(Subcommand)]
enum ConfigAction {
    /// Load and validate configuration from the environment
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Cache { action } => handle_cache_action(action).await?,
        Commands::Config { action } => match action {
            ConfigAction::Check => check_config()?,
        },
    }

    Ok(())
}

/// Opens the file cache named by `CACHE_DIR` / `CACHE_TTL_SECONDS`.
async fn open_file_cache() -> Result<FileCache> {
    let (dir, ttl) = config::load_file_cache_settings()?;

    if std::env::var("REDIS_URL").is_ok() || std::env::var("REDIS_HOST").is_ok() {
        println!(
            "{}",
            "Redis is configured; the server is not using the file cache.".yellow()
        );
        println!();
    }

    FileCache::open(&dir, ttl)
        .await
        .with_context(|| format!("Failed to open cache directory {}", dir.display()))
}

/// Dispatches file cache commands.
async fn handle_cache_action(action: CacheAction) -> Result<()> {
    let cache = open_file_cache().await?;

    match action {
        CacheAction::Stats => show_stats(&cache).await?,
        CacheAction::Keys => list_keys(&cache).await?,
        CacheAction::Sweep { yes } => sweep(&cache, yes).await?,
    }

    Ok(())
}

/// Displays file cache statistics.
async fn show_stats(cache: &FileCache) -> Result<()> {
    println!("{}", "File cache".bright_blue().bold());
    println!();

    let stats = cache
        .stats()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read cache directory: {}", e))?;

    println!("  Directory: {}", cache.dir().display().to_string().cyan());
    println!("  TTL:       {}s", cache.ttl().as_secs());
    println!(
        "  Entries:   {}",
        stats.entries.to_string().bright_white().bold()
    );
    println!("  Size:      {}", human_bytes(stats.bytes).bright_white().bold());
    println!();

    Ok(())
}

/// Prints every stored cache key.
async fn list_keys(cache: &FileCache) -> Result<()> {
    let keys = cache
        .keys()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read cache directory: {}", e))?;

    if keys.is_empty() {
        println!("{}", "No cached entries".yellow());
        return Ok(());
    }

    for key in &keys {
        println!("  {}", key);
    }
    println!();
    println!("{} {}", "Total:".bright_blue().bold(), keys.len());

    Ok(())
}

/// Removes expired and corrupt entries after confirmation.
///
/// Fresh entries are never touched.
async fn sweep(cache: &FileCache, skip_confirm: bool) -> Result<()> {
    println!("{}", "Sweep file cache".bright_blue().bold());
    println!();
    println!("  Directory: {}", cache.dir().display().to_string().cyan());
    println!("  Entries older than {}s will be removed.", cache.ttl().as_secs());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Continue?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let report = cache
        .sweep()
        .await
        .map_err(|e| anyhow::anyhow!("Sweep failed: {}", e))?;

    println!(
        "{} scanned {}, removed {}",
        "Done:".green().bold(),
        report.scanned,
        report.removed.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Loads and validates configuration the same way the server does.
fn check_config() -> Result<()> {
    println!("{}", "Configuration check".bright_blue().bold());
    println!();

    let config = match config::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("  {} {:#}", "Invalid:".red().bold(), e);
            return Err(e);
        }
    };

    println!("  Listen:    {}", config.listen_addr().cyan());
    println!("  Upstream:  {}", config.tmdb_base_url.cyan());
    println!("  TMDB key:  {}", "set".green());
    println!("  Cache TTL: {}s", config.cache_ttl_seconds);

    match config.cache_backend() {
        CacheBackendConfig::Redis { url, op_timeout } => {
            println!(
                "  Backend:   {} {} (op timeout {}ms)",
                "redis".bright_white().bold(),
                mask_connection_string(&url),
                op_timeout.as_millis()
            );
        }
        CacheBackendConfig::File { dir } => {
            println!(
                "  Backend:   {} {}",
                "file".bright_white().bold(),
                dir.display()
            );
        }
    }

    println!();
    println!("{}", "Configuration is valid".green().bold());

    Ok(())
}

/// Formats a byte count with a binary unit suffix.
fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
