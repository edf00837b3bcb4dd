//! Clean command implementation

use anyhow::Result;
use std::fs;

use crate::cli::{CleanArgs, GlobalArgs};
use crate::commands::common::load_project;

/// Execute the clean command
///
/// Removes the generated tiers and the simulation staging area and run
/// state. The manifest lives in bronze and is removed with it.
pub(crate) fn execute(args: &CleanArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let layout = &project.layout;

    let mut targets = layout.generated_dirs();
    targets.push(layout.staging_dir());

    if args.dry_run {
        println!("Dry run - would clean the following paths:");
    } else {
        println!("Cleaning data directory: {}", layout.root().display());
    }

    let mut cleaned_count = 0;
    let mut skipped_count = 0;

    for target in &targets {
        if !target.exists() {
            if global.verbose {
                println!("  Skipping (not found): {}", target.display());
            }
            skipped_count += 1;
            continue;
        }

        if args.dry_run {
            println!("  Would remove: {}", target.display());
            cleaned_count += 1;
            continue;
        }

        match fs::remove_dir_all(target) {
            Ok(_) => {
                println!("  Removed: {}", target.display());
                cleaned_count += 1;
            }
            Err(e) => {
                eprintln!("  Failed to remove {}: {}", target.display(), e);
            }
        }
    }

    let state = layout.simulation_state();
    if state.exists() {
        if args.dry_run {
            println!("  Would remove: {}", state.display());
        } else {
            match fs::remove_file(&state) {
                Ok(_) => println!("  Removed: {}", state.display()),
                Err(e) => eprintln!("  Failed to remove {}: {}", state.display(), e),
            }
        }
    }

    println!();
    if args.dry_run {
        println!(
            "Would clean {} director{}, {} not found",
            cleaned_count,
            if cleaned_count == 1 { "y" } else { "ies" },
            skipped_count
        );
    } else {
        println!(
            "Cleaned {} director{}, {} skipped",
            cleaned_count,
            if cleaned_count == 1 { "y" } else { "ies" },
            skipped_count
        );
    }

    Ok(())
}

#[cfg(test)]
#[path = "clean_test.rs"]
mod tests;
