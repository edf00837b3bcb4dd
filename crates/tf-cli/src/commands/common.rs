//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use tf_core::Project;
use tf_pipeline::{GoldSplit, IngestOutcome, ValidateOutcome};

use crate::cli::GlobalArgs;

/// Load the project named by the global arguments
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let project = match &global.config {
        Some(params) => Project::load_with_params_file(&global.project_dir, params),
        None => Project::load(&global.project_dir),
    }
    .context("Failed to load project")?;

    if global.verbose {
        eprintln!(
            "[verbose] Project {} (data: {})",
            project.root.display(),
            project.layout.root().display()
        );
        if project.contract.is_some() {
            eprintln!("[verbose] Column contract: {}", project.params.contract_path);
        }
    }
    Ok(project)
}

pub(crate) fn report_ingest(outcome: &IngestOutcome) {
    if outcome.is_noop() {
        println!("No incoming batches found.");
        return;
    }
    for batch in &outcome.batches {
        println!("Ingested {} -> bronze/ ({} rows)", batch.name, batch.rows);
    }
    println!(
        "Ingested {} batch{} ({} rows)",
        outcome.batches.len(),
        if outcome.batches.len() == 1 { "" } else { "es" },
        outcome.total_rows()
    );
}

pub(crate) fn report_validate(outcome: Option<&ValidateOutcome>, verbose: bool) {
    let Some(outcome) = outcome else {
        println!("No bronze master file found - nothing to validate.");
        return;
    };
    println!(
        "Validation complete - valid: {} rows, rejected: {} rows",
        outcome.accepted, outcome.rejected
    );
    for rule in &outcome.rule_rejections {
        if rule.rejected > 0 || verbose {
            println!("  {:<28} {} rejected", rule.rule, rule.rejected);
        }
    }
}

pub(crate) fn report_transform(rows: Option<usize>) {
    match rows {
        Some(rows) => println!("Wrote transformed silver ({} rows)", rows),
        None => println!("No validated silver dataset found. Run `tierflow validate` first."),
    }
}

pub(crate) fn report_build(split: Option<&GoldSplit>) {
    match split {
        Some(split) => {
            println!("Built gold dataset (rows={})", split.gold.len());
            println!(
                "Train: {} rows, Test: {} rows",
                split.train.len(),
                split.test.len()
            );
        }
        None => println!("No transformed silver found. Run `tierflow transform` first."),
    }
}
