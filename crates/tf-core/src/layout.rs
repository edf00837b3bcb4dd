//! Tiered filesystem layout (incoming → bronze → silver → gold)

use std::path::{Path, PathBuf};

/// Arrival inbox directory name
pub const INCOMING_DIR: &str = "incoming";
/// Raw append-only tier directory name
pub const BRONZE_DIR: &str = "bronze";
/// Validated tier directory name
pub const SILVER_DIR: &str = "silver";
/// ML-ready tier directory name
pub const GOLD_DIR: &str = "gold";
/// Default staging directory for simulated batches
pub const STAGING_DIR: &str = "_staging_batches";

/// Resolves every artifact path of the tiered data area
///
/// Each stage owns the files it writes; this type only names them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierLayout {
    root: PathBuf,
}

impl TierLayout {
    /// Create a layout rooted at `root` (usually `<project>/data`)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root of the data area
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn incoming_dir(&self) -> PathBuf {
        self.root.join(INCOMING_DIR)
    }

    pub fn bronze_dir(&self) -> PathBuf {
        self.root.join(BRONZE_DIR)
    }

    pub fn silver_dir(&self) -> PathBuf {
        self.root.join(SILVER_DIR)
    }

    pub fn gold_dir(&self) -> PathBuf {
        self.root.join(GOLD_DIR)
    }

    /// Default staging area used by the simulator
    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }

    /// Cumulative bronze master table
    pub fn bronze_master(&self) -> PathBuf {
        self.bronze_dir().join("bronze_all.csv")
    }

    /// Immutable raw copy of an ingested batch file
    pub fn raw_copy(&self, batch_file_name: &str) -> PathBuf {
        self.bronze_dir().join(format!("raw_{}", batch_file_name))
    }

    /// Append-only provenance ledger
    pub fn manifest(&self) -> PathBuf {
        self.bronze_dir().join("manifest.csv")
    }

    pub fn silver_all(&self) -> PathBuf {
        self.silver_dir().join("silver_all.csv")
    }

    pub fn rejected_rows(&self) -> PathBuf {
        self.silver_dir().join("rejected_rows.csv")
    }

    pub fn transformed_silver(&self) -> PathBuf {
        self.silver_dir().join("transformed_silver.csv")
    }

    pub fn gold(&self) -> PathBuf {
        self.gold_dir().join("gold.csv")
    }

    pub fn train(&self) -> PathBuf {
        self.gold_dir().join("train.csv")
    }

    pub fn test(&self) -> PathBuf {
        self.gold_dir().join("test.csv")
    }

    /// Simulation run state file
    pub fn simulation_state(&self) -> PathBuf {
        self.root.join("_simulation_state.json")
    }

    /// Generated tier directories, in pipeline order
    ///
    /// These are what a reset clears before a deterministic replay.
    pub fn generated_dirs(&self) -> Vec<PathBuf> {
        vec![
            self.incoming_dir(),
            self.bronze_dir(),
            self.silver_dir(),
            self.gold_dir(),
        ]
    }
}
