//! Incremental ingestion simulator
//!
//! Splits a source table into staged batches, then replays their arrival one
//! at a time. Each arrival runs the full ingest, validate, transform and
//! build sequence and then records provenance for the batch in the
//! manifest. Batches are processed strictly in order, one at a time.
//!
//! Running two simulators against the same data directory is not supported:
//! the master table and manifest would receive interleaved appends.

use crate::error::{PipelineError, PipelineResult};
use crate::gold::build_gold;
use crate::ingest::ingest;
use crate::splitter::{split_into_batches, write_batches};
use crate::transform::transform_silver;
use crate::validate::{validate_bronze, ValidateOutcome};
use crate::versioning::{
    record_checksum, snapshot_tiers, ContentVersioner, DvcVersioner, GitRevisionControl,
    NoRevisionControl, OfflineVersioner, RevisionControl,
};
use chrono::Utc;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tf_core::table::count_data_lines;
use tf_core::{CoreError, Manifest, ManifestEntry, Project, SimulationState, Table, TierLayout};

/// Simulation states, in the order a batch moves through them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationPhase {
    PreparingBatches,
    Arriving,
    Ingesting,
    Validating,
    Transforming,
    Building,
    Recording,
    Done,
}

impl SimulationPhase {
    /// Per-batch phases, in execution order
    pub const BATCH_PHASES: [SimulationPhase; 6] = [
        SimulationPhase::Arriving,
        SimulationPhase::Ingesting,
        SimulationPhase::Validating,
        SimulationPhase::Transforming,
        SimulationPhase::Building,
        SimulationPhase::Recording,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SimulationPhase::PreparingBatches => "preparing_batches",
            SimulationPhase::Arriving => "arriving",
            SimulationPhase::Ingesting => "ingesting",
            SimulationPhase::Validating => "validating",
            SimulationPhase::Transforming => "transforming",
            SimulationPhase::Building => "building",
            SimulationPhase::Recording => "recording",
            SimulationPhase::Done => "done",
        }
    }
}

impl fmt::Display for SimulationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inputs of a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOptions {
    /// Number of batches to split the source into
    pub n_batches: usize,
    /// Table to split
    pub source: PathBuf,
    /// Where batches are staged before arrival
    pub staging_dir: PathBuf,
    /// Clear the generated tiers before the first arrival
    pub reset: bool,
}

impl SimulationOptions {
    /// Defaults for a project: `n_batches` from params, `gold/train.csv` as
    /// the source, the layout's staging directory, and reset enabled
    pub fn for_project(project: &Project) -> Self {
        Self {
            n_batches: project.params.n_batches,
            source: project.layout.train(),
            staging_dir: project.layout.staging_dir(),
            reset: true,
        }
    }
}

/// Row counts of the cumulative tier tables; `None` when a table is absent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierCounts {
    pub bronze: Option<usize>,
    pub silver: Option<usize>,
    pub gold: Option<usize>,
}

impl TierCounts {
    pub fn read(layout: &TierLayout) -> PipelineResult<Self> {
        Ok(Self {
            bronze: rows_if_present(&layout.bronze_master())?,
            silver: rows_if_present(&layout.silver_all())?,
            gold: rows_if_present(&layout.gold())?,
        })
    }
}

fn rows_if_present(path: &Path) -> PipelineResult<Option<usize>> {
    if path.exists() {
        Ok(Some(Table::read_csv(path)?.len()))
    } else {
        Ok(None)
    }
}

/// What happened to one arriving batch
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub batch_name: String,
    pub rows_in_batch: usize,
    pub checksum: String,
    pub commit_id: String,
    pub validation: Option<ValidateOutcome>,
    /// Whether the tier snapshot was committed
    pub snapshot_committed: bool,
    /// Tier sizes after the batch
    pub counts: TierCounts,
}

/// Outcome of a completed simulation
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub run_id: String,
    pub batches: Vec<BatchReport>,
}

/// Progress callbacks; every method defaults to doing nothing
pub trait SimulationObserver {
    /// Staged batches are written and arrivals are about to start
    fn batches_prepared(&mut self, _staged: &[PathBuf]) {}

    /// `batch` entered `phase`
    fn phase_started(&mut self, _batch: &str, _phase: SimulationPhase) {}

    /// `batch` finished all phases
    fn batch_finished(&mut self, _report: &BatchReport) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SimulationObserver for NoopObserver {}

/// Drives batch arrivals through the pipeline and records provenance
pub struct IncrementalSimulator<'a> {
    project: &'a Project,
    versioner: Box<dyn ContentVersioner>,
    revisions: Box<dyn RevisionControl>,
}

impl<'a> IncrementalSimulator<'a> {
    pub fn new(
        project: &'a Project,
        versioner: Box<dyn ContentVersioner>,
        revisions: Box<dyn RevisionControl>,
    ) -> Self {
        Self {
            project,
            versioner,
            revisions,
        }
    }

    /// Simulator using `dvc` and `git` from the project root
    pub fn with_external_tools(project: &'a Project) -> Self {
        Self::new(
            project,
            Box::new(DvcVersioner::new(&project.root)),
            Box::new(GitRevisionControl::new(&project.root)),
        )
    }

    /// Simulator that never calls external tools
    pub fn offline(project: &'a Project) -> Self {
        Self::new(
            project,
            Box::new(OfflineVersioner),
            Box::new(NoRevisionControl),
        )
    }

    fn layout(&self) -> &TierLayout {
        &self.project.layout
    }

    /// Run the simulation to completion
    ///
    /// Any stage failure stops the run; the run state file then records the
    /// batch and phase that were in flight.
    pub fn run(
        &self,
        options: &SimulationOptions,
        observer: &mut dyn SimulationObserver,
    ) -> PipelineResult<SimulationSummary> {
        if options.n_batches == 0 {
            return Err(PipelineError::InvalidBatchCount { count: 0 });
        }
        let staged = self.prepare(options)?;
        observer.batches_prepared(&staged);

        if options.reset {
            self.reset_tiers()?;
        }
        let layout = self.layout();
        for dir in [layout.incoming_dir(), layout.bronze_dir()] {
            fs::create_dir_all(&dir).map_err(|e| CoreError::io(&dir, e))?;
        }
        Manifest::ensure(&layout.manifest())?;

        let names: Vec<String> = staged.iter().map(|p| file_name(p)).collect();
        let state_path = layout.simulation_state();
        let mut state = SimulationState::new(names);
        state.save(&state_path)?;

        let mut reports = Vec::with_capacity(staged.len());
        for batch in &staged {
            match self.process_batch(batch, &mut state, &state_path, observer) {
                Ok(report) => {
                    observer.batch_finished(&report);
                    reports.push(report);
                }
                Err(e) => {
                    state.mark_failed(&e.to_string());
                    if let Err(save_err) = state.save(&state_path) {
                        log::warn!("Could not save simulation state: {}", save_err);
                    }
                    return Err(e);
                }
            }
        }

        state.mark_completed();
        state.save(&state_path)?;
        observer.phase_started("", SimulationPhase::Done);
        log::info!("Simulation complete: {} batches processed", reports.len());

        Ok(SimulationSummary {
            run_id: state.run_id,
            batches: reports,
        })
    }

    /// Split the source and write it into a fresh staging directory
    fn prepare(&self, options: &SimulationOptions) -> PipelineResult<Vec<PathBuf>> {
        if !options.source.exists() {
            return Err(PipelineError::SourceNotFound {
                path: options.source.display().to_string(),
            });
        }
        // Read before any reset: the source may live inside a generated tier.
        let source = Table::read_csv(&options.source)?;
        let batches = split_into_batches(&source, options.n_batches)?;

        let staging = &options.staging_dir;
        if staging.exists() {
            fs::remove_dir_all(staging).map_err(|e| CoreError::io(staging, e))?;
        }
        fs::create_dir_all(staging).map_err(|e| CoreError::io(staging, e))?;

        let staged = write_batches(&batches, staging)?;
        for (path, batch) in staged.iter().zip(&batches) {
            log::info!("Prepared {} ({} rows)", path.display(), batch.len());
        }
        Ok(staged)
    }

    fn reset_tiers(&self) -> PipelineResult<()> {
        for dir in self.layout().generated_dirs() {
            if dir.exists() {
                fs::remove_dir_all(&dir).map_err(|e| CoreError::io(&dir, e))?;
                log::debug!("Removed {}", dir.display());
            }
        }
        Ok(())
    }

    fn process_batch(
        &self,
        staged: &Path,
        state: &mut SimulationState,
        state_path: &Path,
        observer: &mut dyn SimulationObserver,
    ) -> PipelineResult<BatchReport> {
        let name = file_name(staged);
        let layout = self.layout();
        let mut enter = |phase: SimulationPhase| -> PipelineResult<()> {
            state.enter_phase(&name, phase.as_str());
            state.save(state_path)?;
            observer.phase_started(&name, phase);
            Ok(())
        };

        enter(SimulationPhase::Arriving)?;
        let arrival = layout.incoming_dir().join(&name);
        fs::copy(staged, &arrival).map_err(|e| CoreError::io(&arrival, e))?;
        log::info!("Arrived batch: {} -> incoming/", name);

        enter(SimulationPhase::Ingesting)?;
        let ingested = ingest(layout)?;

        enter(SimulationPhase::Validating)?;
        let validation = validate_bronze(self.project)?;

        enter(SimulationPhase::Transforming)?;
        transform_silver(self.project)?;

        enter(SimulationPhase::Building)?;
        build_gold(self.project)?;

        enter(SimulationPhase::Recording)?;
        let raw = ingested
            .batches
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.raw_path.clone())
            .unwrap_or_else(|| layout.raw_copy(&name));
        let rows_in_batch = batch_row_count(&raw, staged);
        let checksum = record_checksum(self.versioner.as_ref(), &raw);
        let commit_id = self.revisions.head().unwrap_or_default();
        Manifest::append(
            &layout.manifest(),
            &ManifestEntry {
                batch_name: name.clone(),
                rows_in_batch,
                raw_path: raw.display().to_string(),
                checksum: checksum.clone(),
                commit_id: commit_id.clone(),
                recorded_at: Utc::now(),
            },
        )?;

        let stem = staged
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());
        let snapshot_committed = match snapshot_tiers(
            &self.project.root,
            layout,
            self.versioner.as_ref(),
            self.revisions.as_ref(),
            &stem,
        ) {
            Ok(committed) => committed,
            Err(e) => {
                log::warn!("Snapshot for {} skipped: {}", name, e);
                false
            }
        };

        let counts = TierCounts::read(layout)?;
        state.complete_batch(&name);
        state.save(state_path)?;

        Ok(BatchReport {
            batch_name: name,
            rows_in_batch,
            checksum,
            commit_id,
            validation,
            snapshot_committed,
            counts,
        })
    }
}

/// Rows in a batch: parsed from the raw copy, else counted in the staged file
fn batch_row_count(raw: &Path, staged: &Path) -> usize {
    match Table::read_csv(raw) {
        Ok(table) => table.len(),
        Err(e) => {
            log::warn!("Could not read {}: {}; counting staged lines", raw.display(), e);
            count_data_lines(staged).unwrap_or(0)
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "simulate_test.rs"]
mod tests;
