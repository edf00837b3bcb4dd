//! Run command implementation: every stage once, in order

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::commands::common::{
    load_project, report_build, report_ingest, report_transform, report_validate,
};

/// Execute the run command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;

    let ingested = tf_pipeline::ingest(&project.layout).context("Ingest failed")?;
    report_ingest(&ingested);

    let validated = tf_pipeline::validate_bronze(&project).context("Validation failed")?;
    report_validate(validated.as_ref(), global.verbose);

    let transformed = tf_pipeline::transform_silver(&project).context("Transform failed")?;
    report_transform(transformed);

    let split = tf_pipeline::build_gold(&project).context("Gold build failed")?;
    report_build(split.as_ref());

    Ok(())
}
