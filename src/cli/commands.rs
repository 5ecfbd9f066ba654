//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Incremental extractor for a shop's GraphQL admin API
#[derive(Parser, Debug)]
#[command(name = "shop-tap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// State file (JSON)
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Inline state JSON
    #[arg(long, global = true)]
    pub state_json: Option<String>,

    /// Directory of stream schemas (defaults to the built-in schemas)
    #[arg(long, global = true)]
    pub schemas_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the catalog of available streams
    Discover,

    /// Extract records from the selected streams
    Sync {
        /// Catalog file (JSON); every stream is selected when omitted
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Write the final state to this file
        #[arg(long)]
        state_output: Option<PathBuf>,
    },
}
