//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// cfs - versioned asset cache
///
/// Stores binary assets under a path and version tag, with lazy expiry.
#[derive(Parser, Debug)]
#[command(name = "cfs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CFS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Store directory (overrides the configured one)
    #[arg(short, long, global = true, env = "CFS_STORE")]
    pub store: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a file as an asset
    Put(PutArgs),

    /// Fetch an asset's payload
    Get(GetArgs),

    /// Remove one version of an asset
    Rm(RmArgs),

    /// List stored versions of a path
    Versions(VersionsArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the put command
#[derive(Parser, Debug)]
pub struct PutArgs {
    /// Asset path, optionally with a version (e.g. images/logo.png?v2)
    pub asset: String,

    /// File holding the payload
    pub file: PathBuf,

    /// Mime type (guessed from the file extension when omitted)
    #[arg(short, long)]
    pub mime: Option<String>,
}

/// Arguments for the get command
#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Asset path, optionally with a version
    pub asset: String,

    /// Write the payload to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the rm command
#[derive(Parser, Debug)]
pub struct RmArgs {
    /// Asset path, optionally with a version
    pub asset: String,
}

/// Arguments for the versions command
#[derive(Parser, Debug)]
pub struct VersionsArgs {
    /// Asset path (without version)
    pub path: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for listings
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
