use super::*;
use crate::splitter::synthesize;
use tempfile::tempdir;
use tf_core::RunStatus;

fn project_with_source(rows: usize) -> (tempfile::TempDir, Project, PathBuf) {
    let dir = tempdir().unwrap();
    let project = Project::load(dir.path()).unwrap();
    let source = dir.path().join("source.csv");
    synthesize(rows, 42).write_csv(&source).unwrap();
    (dir, project, source)
}

fn options(project: &Project, source: PathBuf, n: usize) -> SimulationOptions {
    SimulationOptions {
        n_batches: n,
        source,
        ..SimulationOptions::for_project(project)
    }
}

#[derive(Default)]
struct PhaseLog {
    prepared: usize,
    phases: Vec<(String, SimulationPhase)>,
    finished: Vec<String>,
}

impl SimulationObserver for PhaseLog {
    fn batches_prepared(&mut self, staged: &[PathBuf]) {
        self.prepared = staged.len();
    }

    fn phase_started(&mut self, batch: &str, phase: SimulationPhase) {
        self.phases.push((batch.to_string(), phase));
    }

    fn batch_finished(&mut self, report: &BatchReport) {
        self.finished.push(report.batch_name.clone());
    }
}

#[test]
fn test_manifest_has_one_entry_per_batch_in_order() {
    let (_dir, project, source) = project_with_source(50);
    let summary = IncrementalSimulator::offline(&project)
        .run(&options(&project, source, 5), &mut NoopObserver)
        .unwrap();
    assert_eq!(summary.batches.len(), 5);

    let entries = Manifest::load(&project.layout.manifest()).unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.batch_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "batch_01.csv",
            "batch_02.csv",
            "batch_03.csv",
            "batch_04.csv",
            "batch_05.csv"
        ]
    );
    assert!(entries.iter().all(|e| e.rows_in_batch == 10));
    assert!(entries.iter().all(|e| e.checksum.len() == 64));
    assert!(entries.iter().all(|e| e.commit_id.is_empty()));
}

#[test]
fn test_tiers_accumulate_across_arrivals() {
    let (_dir, project, source) = project_with_source(30);
    let summary = IncrementalSimulator::offline(&project)
        .run(&options(&project, source, 3), &mut NoopObserver)
        .unwrap();

    let bronze: Vec<Option<usize>> = summary.batches.iter().map(|b| b.counts.bronze).collect();
    assert_eq!(bronze, vec![Some(10), Some(20), Some(30)]);

    let last = summary.batches.last().unwrap();
    assert_eq!(last.counts.silver, Some(30));
    assert_eq!(last.counts.gold, Some(30));
    assert!(!last.snapshot_committed);

    let layout = &project.layout;
    for name in ["batch_01.csv", "batch_02.csv", "batch_03.csv"] {
        assert!(layout.raw_copy(name).exists());
        assert!(versioning_sidecar(&layout.raw_copy(name)).exists());
    }
    assert!(layout.train().exists() && layout.test().exists());
    assert!(pending(&layout.incoming_dir()).is_empty());
}

fn versioning_sidecar(path: &Path) -> PathBuf {
    crate::versioning::sidecar_path(path)
}

fn pending(dir: &Path) -> Vec<PathBuf> {
    crate::ingest::pending_batches(dir).unwrap()
}

#[test]
fn test_reset_clears_previous_outputs() {
    let (_dir, project, source) = project_with_source(20);
    let sim = IncrementalSimulator::offline(&project);
    sim.run(&options(&project, source.clone(), 2), &mut NoopObserver)
        .unwrap();
    sim.run(&options(&project, source, 2), &mut NoopObserver)
        .unwrap();

    assert_eq!(
        Table::read_csv(&project.layout.bronze_master()).unwrap().len(),
        20
    );
    assert_eq!(Manifest::load(&project.layout.manifest()).unwrap().len(), 2);
}

#[test]
fn test_no_reset_appends_to_existing_tiers() {
    let (_dir, project, source) = project_with_source(20);
    let sim = IncrementalSimulator::offline(&project);
    sim.run(&options(&project, source.clone(), 2), &mut NoopObserver)
        .unwrap();
    let opts = SimulationOptions {
        reset: false,
        ..options(&project, source, 2)
    };
    let summary = sim.run(&opts, &mut NoopObserver).unwrap();

    assert_eq!(Manifest::load(&project.layout.manifest()).unwrap().len(), 4);
    // replayed ids duplicate the first run, so every row is rejected
    let last = summary.batches.last().unwrap();
    assert_eq!(last.counts.bronze, Some(40));
    assert_eq!(last.counts.silver, Some(0));

    // every arrival keeps its own raw copy, and bronze is their sum
    let entries = Manifest::load(&project.layout.manifest()).unwrap();
    let raw_paths: std::collections::HashSet<&str> =
        entries.iter().map(|e| e.raw_path.as_str()).collect();
    assert_eq!(raw_paths.len(), 4);
    let raw_rows: usize = entries
        .iter()
        .map(|e| Table::read_csv(Path::new(&e.raw_path)).unwrap().len())
        .sum();
    assert_eq!(raw_rows, 40);
    assert!(entries.iter().all(|e| e.rows_in_batch == 10));
}

#[test]
fn test_source_inside_gold_survives_reset() {
    let dir = tempdir().unwrap();
    let project = Project::load(dir.path()).unwrap();
    synthesize(12, 1).write_csv(&project.layout.train()).unwrap();

    let summary = IncrementalSimulator::offline(&project)
        .run(&SimulationOptions::for_project(&project), &mut NoopObserver)
        .unwrap();
    let total: usize = summary.batches.iter().map(|b| b.rows_in_batch).sum();
    assert_eq!(total, 12);
}

#[test]
fn test_missing_source_is_an_error() {
    let dir = tempdir().unwrap();
    let project = Project::load(dir.path()).unwrap();
    let err = IncrementalSimulator::offline(&project)
        .run(
            &options(&project, dir.path().join("missing.csv"), 2),
            &mut NoopObserver,
        )
        .unwrap_err();
    assert!(matches!(err, PipelineError::SourceNotFound { .. }));
}

#[test]
fn test_empty_source_still_stages_n_batches() {
    let dir = tempdir().unwrap();
    let project = Project::load(dir.path()).unwrap();
    let source = dir.path().join("empty.csv");
    synthesize(0, 1).write_csv(&source).unwrap();

    let summary = IncrementalSimulator::offline(&project)
        .run(&options(&project, source, 3), &mut NoopObserver)
        .unwrap();
    assert_eq!(summary.batches.len(), 3);
    assert!(summary.batches.iter().all(|b| b.rows_in_batch == 0));
    assert_eq!(Manifest::load(&project.layout.manifest()).unwrap().len(), 3);
}

#[test]
fn test_observer_sees_phases_in_order() {
    let (_dir, project, source) = project_with_source(4);
    let mut log = PhaseLog::default();
    IncrementalSimulator::offline(&project)
        .run(&options(&project, source, 2), &mut log)
        .unwrap();

    assert_eq!(log.prepared, 2);
    assert_eq!(log.finished, vec!["batch_01.csv", "batch_02.csv"]);
    let first: Vec<SimulationPhase> = log
        .phases
        .iter()
        .filter(|(b, _)| b == "batch_01.csv")
        .map(|(_, p)| *p)
        .collect();
    assert_eq!(first, SimulationPhase::BATCH_PHASES.to_vec());
    assert_eq!(log.phases.last().unwrap().1, SimulationPhase::Done);
}

#[test]
fn test_run_state_is_completed() {
    let (_dir, project, source) = project_with_source(6);
    let summary = IncrementalSimulator::offline(&project)
        .run(&options(&project, source, 3), &mut NoopObserver)
        .unwrap();

    let state = SimulationState::load(&project.layout.simulation_state())
        .unwrap()
        .unwrap();
    assert_eq!(state.run_id, summary.run_id);
    assert_eq!(state.status, RunStatus::Completed);
    assert_eq!(state.completed_batches.len(), 3);
    assert!(state.pending_batches.is_empty());
}

#[test]
fn test_schema_error_marks_run_failed() {
    let dir = tempdir().unwrap();
    let project = Project::load(dir.path()).unwrap();
    let source = dir.path().join("bad.csv");
    std::fs::write(&source, "id,feature_num\n1,2\n2,3\n").unwrap();

    let err = IncrementalSimulator::offline(&project)
        .run(&options(&project, source, 1), &mut NoopObserver)
        .unwrap_err();
    assert!(err.is_schema_error());

    let state = SimulationState::load(&project.layout.simulation_state())
        .unwrap()
        .unwrap();
    assert_eq!(state.status, RunStatus::Failed);
    assert_eq!(state.current_phase.as_deref(), Some("validating"));
}

#[test]
fn test_zero_batches_rejected() {
    let (_dir, project, source) = project_with_source(3);
    let err = IncrementalSimulator::offline(&project)
        .run(&options(&project, source, 0), &mut NoopObserver)
        .unwrap_err();
    assert!(matches!(err, PipelineError::InvalidBatchCount { .. }));
}
