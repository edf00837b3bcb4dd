//! Build command implementation

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::commands::common::{load_project, report_build};

/// Execute the build command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let split = tf_pipeline::build_gold(&project).context("Gold build failed")?;
    report_build(split.as_ref());
    Ok(())
}
