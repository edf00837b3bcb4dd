//! Tierflow CLI - tiered batch data pipeline with provenance tracking

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod logger;

use cli::Cli;
use commands::{build, checksums, clean, generate, ingest, run, simulate, transform, validate, version};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.global.verbose);

    match &cli.command {
        cli::Commands::Generate(args) => generate::execute(args, &cli.global),
        cli::Commands::Ingest => ingest::execute(&cli.global),
        cli::Commands::Validate => validate::execute(&cli.global),
        cli::Commands::Transform => transform::execute(&cli.global),
        cli::Commands::Build => build::execute(&cli.global),
        cli::Commands::Run => run::execute(&cli.global),
        cli::Commands::Simulate(args) => simulate::execute(args, &cli.global),
        cli::Commands::Clean(args) => clean::execute(args, &cli.global),
        cli::Commands::Version => version::execute(&cli.global),
        cli::Commands::Checksums => checksums::execute(&cli.global),
    }
}
