//! Validate command implementation

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::commands::common::{load_project, report_validate};

/// Execute the validate command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let outcome = tf_pipeline::validate_bronze(&project).context("Validation failed")?;
    report_validate(outcome.as_ref(), global.verbose);
    Ok(())
}
