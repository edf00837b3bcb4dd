//! Version command implementation

use anyhow::{Context, Result};
use tf_pipeline::{data_version, GitRevisionControl};

use crate::cli::GlobalArgs;
use crate::commands::common::load_project;

/// Execute the version command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let revisions = GitRevisionControl::new(&project.root);
    let version =
        data_version(&project, &revisions).context("Failed to determine data version")?;

    let json = serde_json::to_string_pretty(&version).context("Failed to serialize version")?;
    println!("{}", json);
    Ok(())
}
