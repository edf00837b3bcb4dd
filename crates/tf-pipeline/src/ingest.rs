//! Bronze ingestion: consume the arrival inbox into the append-only tier

use crate::error::{PipelineError, PipelineResult};
use std::fs;
use std::path::{Path, PathBuf};
use tf_core::{CoreError, Table, TierLayout};

/// One batch moved from the inbox into bronze
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedBatch {
    /// Original file name in the inbox
    pub name: String,
    /// Immutable raw copy in bronze
    pub raw_path: PathBuf,
    /// Rows appended to the master table
    pub rows: usize,
}

/// Result of an ingest pass
#[derive(Debug, Clone, Default)]
pub struct IngestOutcome {
    pub batches: Vec<IngestedBatch>,
}

impl IngestOutcome {
    /// True when the inbox held no batches
    pub fn is_noop(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.batches.iter().map(|b| b.rows).sum()
    }
}

/// CSV files waiting in `dir`, sorted by name
pub fn pending_batches(dir: &Path) -> PipelineResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let pattern = format!("{}/*.csv", glob::Pattern::escape(&dir.display().to_string()));
    let entries = glob::glob(&pattern).map_err(|e| PipelineError::InvalidPattern {
        pattern: pattern.clone(),
        message: e.to_string(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() => Some(path),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Skipping unreadable inbox entry: {}", e);
                None
            }
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Raw copy path for `name` that no earlier arrival has used
///
/// Raw copies are never overwritten: a repeated batch name gets
/// `raw_<stem>_2.<ext>`, then `_3`, and so on.
fn unused_raw_path(layout: &TierLayout, name: &str) -> PathBuf {
    let first = layout.raw_copy(name);
    if !first.exists() {
        return first;
    }
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (2u32..)
        .map(|n| layout.raw_copy(&format!("{}_{}{}", stem, n, ext)))
        .find(|p| !p.exists())
        .unwrap_or(first)
}

/// Ingest every batch in the inbox, in name order
///
/// Each file is copied verbatim to `bronze/raw_<name>` (or the next free
/// `raw_<stem>_<n>` name when that batch name arrived before), its rows are
/// appended to `bronze/bronze_all.csv`, and it is then removed from the
/// inbox. An empty inbox is a no-op.
///
/// There is no rollback: an interruption between the copy and the inbox
/// removal leaves the batch partially ingested.
pub fn ingest(layout: &TierLayout) -> PipelineResult<IngestOutcome> {
    let files = pending_batches(&layout.incoming_dir())?;
    if files.is_empty() {
        log::info!("No incoming batches found");
        return Ok(IngestOutcome::default());
    }

    let bronze = layout.bronze_dir();
    fs::create_dir_all(&bronze).map_err(|e| CoreError::io(&bronze, e))?;

    let master = layout.bronze_master();
    let mut outcome = IngestOutcome::default();
    for file in files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        log::info!("Ingesting {} -> bronze/", name);

        let raw_path = unused_raw_path(layout, &name);
        fs::copy(&file, &raw_path).map_err(|e| CoreError::io(&raw_path, e))?;

        let batch = Table::read_csv(&file)?;
        let rows = batch.append_csv(&master)?;

        fs::remove_file(&file).map_err(|e| CoreError::io(&file, e))?;
        outcome.batches.push(IngestedBatch {
            name,
            raw_path,
            rows,
        });
    }

    log::info!("Updated master bronze file at {}", master.display());
    Ok(outcome)
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod tests;
