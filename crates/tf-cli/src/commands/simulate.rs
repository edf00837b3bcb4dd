//! Simulate command implementation

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tf_core::Project;
use tf_pipeline::{
    BatchReport, IncrementalSimulator, SimulationObserver, SimulationOptions, SimulationPhase,
    TierCounts,
};

use crate::cli::{GlobalArgs, SimulateArgs};
use crate::commands::common::load_project;

/// Progress bar over batch arrivals with a per-batch tier report
struct ProgressObserver {
    progress: Option<ProgressBar>,
    verbose: bool,
}

impl ProgressObserver {
    fn new(verbose: bool) -> Self {
        Self {
            progress: None,
            verbose,
        }
    }

    fn println(&self, line: String) {
        match &self.progress {
            Some(pb) => pb.println(line),
            None => println!("{}", line),
        }
    }
}

impl SimulationObserver for ProgressObserver {
    fn batches_prepared(&mut self, staged: &[PathBuf]) {
        for path in staged {
            println!("Prepared {}", path.display());
        }
        let pb = ProgressBar::new(staged.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        self.progress = Some(pb);
    }

    fn phase_started(&mut self, batch: &str, phase: SimulationPhase) {
        if phase == SimulationPhase::Done {
            if let Some(pb) = self.progress.take() {
                pb.finish_with_message("done");
            }
            return;
        }
        if let Some(pb) = &self.progress {
            pb.set_message(format!("{} {}", batch, phase));
        }
        if self.verbose {
            self.println(format!("[verbose] {}: {}", batch, phase));
        }
    }

    fn batch_finished(&mut self, report: &BatchReport) {
        let mut lines = vec![format!(
            "Batch {}: {} rows, checksum {}",
            report.batch_name,
            report.rows_in_batch,
            if report.checksum.is_empty() {
                "-"
            } else {
                report.checksum.as_str()
            }
        )];
        if let Some(validation) = &report.validation {
            lines.push(format!(
                "  validation: {} valid, {} rejected",
                validation.accepted, validation.rejected
            ));
        }
        lines.extend(format_counts(&report.counts));
        if report.snapshot_committed {
            lines.push("  snapshot committed".to_string());
        }
        for line in lines {
            self.println(line);
        }
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
    }
}

fn format_counts(counts: &TierCounts) -> Vec<String> {
    [
        ("bronze_all", counts.bronze),
        ("silver_all", counts.silver),
        ("gold", counts.gold),
    ]
    .into_iter()
    .filter_map(|(name, rows)| rows.map(|r| format!("  {} rows: {}", name, r)))
    .collect()
}

/// Resolve CLI arguments against project defaults
///
/// Relative paths are taken relative to the project directory.
fn resolve_options(args: &SimulateArgs, project: &Project) -> Result<SimulationOptions> {
    let defaults = SimulationOptions::for_project(project);
    let n_batches = args.n.unwrap_or(defaults.n_batches);
    anyhow::ensure!(n_batches > 0, "--n must be at least 1");

    Ok(SimulationOptions {
        n_batches,
        source: args
            .source
            .as_ref()
            .map_or(defaults.source, |p| project.root.join(p)),
        staging_dir: args
            .staging
            .as_ref()
            .map_or(defaults.staging_dir, |p| project.root.join(p)),
        reset: !args.no_reset,
    })
}

/// Execute the simulate command
pub(crate) fn execute(args: &SimulateArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let options = resolve_options(args, &project)?;

    if global.verbose {
        eprintln!(
            "[verbose] Simulating {} batches from {} (staging: {}, reset: {})",
            options.n_batches,
            options.source.display(),
            options.staging_dir.display(),
            options.reset
        );
    }

    let simulator = if args.offline {
        IncrementalSimulator::offline(&project)
    } else {
        IncrementalSimulator::with_external_tools(&project)
    };
    let mut observer = ProgressObserver::new(global.verbose);
    let summary = simulator
        .run(&options, &mut observer)
        .context("Simulation failed")?;

    println!();
    println!(
        "Simulation {} complete. Processed {} batches incrementally.",
        summary.run_id,
        summary.batches.len()
    );
    Ok(())
}
