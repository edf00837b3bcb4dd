//! Transform command implementation

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::commands::common::{load_project, report_transform};

/// Execute the transform command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let rows = tf_pipeline::transform_silver(&project).context("Transform failed")?;
    report_transform(rows);
    Ok(())
}
