//! Run state tracking for incremental simulations
//!
//! The simulator saves this state after every phase transition. After an
//! interrupted run it shows which batch and phase were in flight, which is
//! where bronze and the manifest may disagree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// State of a simulation in progress or completed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    /// Short random id, also reported in the simulation summary
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
    pub status: RunStatus,

    /// Batch currently being processed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_batch: Option<String>,

    /// Phase the current batch is in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_phase: Option<String>,

    /// Batches fully processed and recorded
    pub completed_batches: Vec<String>,

    /// Batches not yet started
    pub pending_batches: Vec<String>,

    /// Error message when the run failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    /// Stopped by an error; `current_batch` and `current_phase` are kept
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Running => write!(f, "running"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}

impl SimulationState {
    /// Create a new run state with every batch pending
    pub fn new(pending_batches: Vec<String>) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string()[..8].to_string(),
            started_at: Utc::now(),
            last_updated_at: Utc::now(),
            status: RunStatus::Running,
            current_batch: None,
            current_phase: None,
            completed_batches: Vec::new(),
            pending_batches,
            error: None,
        }
    }

    /// Previously saved state, or `None` when no run has saved one
    pub fn load(path: &Path) -> CoreResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let state: SimulationState = serde_json::from_str(&content)?;
        Ok(Some(state))
    }

    /// Write the state next to `path` and rename it into place
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
        }

        let temp_path = path.with_extension(format!("json.{}.tmp", std::process::id()));
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&temp_path, json).map_err(|e| CoreError::io(&temp_path, e))?;
        fs::rename(&temp_path, path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            CoreError::io(path, e)
        })?;

        Ok(())
    }

    /// Record that `batch` entered `phase`
    pub fn enter_phase(&mut self, batch: &str, phase: &str) {
        if self.current_batch.as_deref() != Some(batch) {
            self.pending_batches.retain(|b| b != batch);
            self.current_batch = Some(batch.to_string());
        }
        self.current_phase = Some(phase.to_string());
        self.last_updated_at = Utc::now();
    }

    /// Mark the current batch as fully recorded
    pub fn complete_batch(&mut self, batch: &str) {
        self.pending_batches.retain(|b| b != batch);
        self.completed_batches.push(batch.to_string());
        self.current_batch = None;
        self.current_phase = None;
        self.last_updated_at = Utc::now();
    }

    pub fn mark_completed(&mut self) {
        self.status = RunStatus::Completed;
        self.last_updated_at = Utc::now();
    }

    /// Mark the run as failed, keeping the in-flight batch and phase
    pub fn mark_failed(&mut self, error: &str) {
        self.status = RunStatus::Failed;
        self.error = Some(error.to_string());
        self.last_updated_at = Utc::now();
    }
}
