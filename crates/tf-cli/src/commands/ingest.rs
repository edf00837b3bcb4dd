//! Ingest command implementation

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::commands::common::{load_project, report_ingest};

/// Execute the ingest command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let outcome = tf_pipeline::ingest(&project.layout).context("Ingest failed")?;
    report_ingest(&outcome);
    Ok(())
}
