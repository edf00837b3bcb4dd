//! Checksums command implementation

use anyhow::{Context, Result};
use tf_pipeline::versioning::{sidecar_path, write_sidecar};

use crate::cli::GlobalArgs;
use crate::commands::common::load_project;

/// Execute the checksums command
///
/// Writes a local `.dvc` record next to each cumulative tier table.
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let layout = &project.layout;

    let mut written = 0;
    for target in [layout.bronze_master(), layout.silver_all(), layout.gold()] {
        if !target.exists() {
            println!("Target missing, skipping: {}", target.display());
            continue;
        }
        let checksum = write_sidecar(&target)
            .with_context(|| format!("Failed to write checksum record for {}", target.display()))?;
        println!(
            "Wrote {} (sha256 {})",
            sidecar_path(&target).display(),
            checksum
        );
        written += 1;
    }

    println!("Wrote {} checksum record(s)", written);
    Ok(())
}
