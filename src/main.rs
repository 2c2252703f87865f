//! cfs - versioned asset cache
//!
//! CLI entry point that dispatches to subcommands.

use cfs::cli::{Cli, Commands};
use cfs::config::ConfigManager;
use cfs::error::CfsResult;
use cfs::{Cfs, FileStore};
use clap::Parser;
use console::style;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> CfsResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("cfs=warn"),
        1 => EnvFilter::new("cfs=info"),
        _ => EnvFilter::new("cfs=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = manager.load().await?;

    // Config command doesn't need a store
    if let Commands::Config(args) = cli.command {
        return cfs::cli::commands::config(args, &manager, &config).await;
    }

    let store_dir = cli
        .store
        .or_else(|| config.store.dir.clone())
        .unwrap_or_else(ConfigManager::default_store_dir);
    debug!("Using store at {}", store_dir.display());

    let cache = Cfs::new(Arc::new(FileStore::new(store_dir)), config.cache.clone());

    match cli.command {
        Commands::Config(_) => unreachable!("Config handled above"),
        Commands::Put(args) => cfs::cli::commands::put(args, &cache).await,
        Commands::Get(args) => cfs::cli::commands::get(args, &cache).await,
        Commands::Rm(args) => cfs::cli::commands::rm(args, &cache).await,
        Commands::Versions(args) => cfs::cli::commands::versions(args, &cache).await,
    }
}
