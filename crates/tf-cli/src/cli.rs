//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Tierflow - tiered batch data pipeline (bronze → silver → gold)
#[derive(Parser, Debug)]
#[command(name = "tierflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Override params file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize raw batches into the arrival inbox
    Generate(GenerateArgs),

    /// Move arrived batches into bronze
    Ingest,

    /// Validate bronze into accepted and rejected silver rows
    Validate,

    /// Derive features from validated silver rows
    Transform,

    /// Build the gold dataset and its train/test split
    Build,

    /// Run ingest, validate, transform and build once
    Run,

    /// Replay a table as incrementally arriving batches
    Simulate(SimulateArgs),

    /// Remove generated tier directories
    Clean(CleanArgs),

    /// Print the version of the gold dataset as JSON
    Version,

    /// Write checksum records for the cumulative tier tables
    Checksums,
}

/// Arguments for the generate command
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Number of batches (default: n_batches from params)
    #[arg(short, long)]
    pub batches: Option<usize>,

    /// Rows per batch (default: rows_per_batch from params)
    #[arg(short, long)]
    pub rows: Option<usize>,

    /// Random seed (default: random_seed from params)
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for the simulate command
#[derive(Args, Debug, Default)]
pub struct SimulateArgs {
    /// Number of batches to split the source into
    #[arg(long = "n")]
    pub n: Option<usize>,

    /// Source CSV to split (default: <data_dir>/gold/train.csv)
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Where to write batch files before arrival (default: <data_dir>/_staging_batches)
    #[arg(long)]
    pub staging: Option<PathBuf>,

    /// Do not clear generated data directories before simulating
    #[arg(long)]
    pub no_reset: bool,

    /// Skip dvc and git; use local checksums only
    #[arg(long)]
    pub offline: bool,
}

/// Arguments for the clean command
#[derive(Args, Debug, Default)]
pub struct CleanArgs {
    /// Show what would be removed without removing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
