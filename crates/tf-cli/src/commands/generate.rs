//! Generate command implementation

use anyhow::{Context, Result};

use crate::cli::{GenerateArgs, GlobalArgs};
use crate::commands::common::load_project;

/// Execute the generate command
pub(crate) fn execute(args: &GenerateArgs, global: &GlobalArgs) -> Result<()> {
    let mut project = load_project(global)?;
    if let Some(batches) = args.batches {
        anyhow::ensure!(batches > 0, "--batches must be at least 1");
        project.params.n_batches = batches;
    }
    if let Some(rows) = args.rows {
        project.params.rows_per_batch = rows;
    }
    if let Some(seed) = args.seed {
        project.params.random_seed = seed;
    }

    let outcome = tf_pipeline::generate(&project).context("Failed to generate batches")?;
    for file in &outcome.files {
        println!(
            "Wrote {} ({} rows)",
            file.display(),
            project.params.rows_per_batch
        );
    }
    println!(
        "Created {} batches in '{}' (total rows={})",
        outcome.files.len(),
        project.layout.incoming_dir().display(),
        outcome.total_rows
    );
    Ok(())
}
