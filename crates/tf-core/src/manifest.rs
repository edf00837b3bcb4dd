//! Append-only provenance ledger for ingested batches
//!
//! `bronze/manifest.csv` records one row per batch, in arrival order. Rows
//! are only ever appended; nothing in Tierflow rewrites or truncates the
//! ledger.

use crate::error::{CoreError, CoreResult};
use crate::table::ensure_parent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::Path;

/// Header line of the manifest file
pub const MANIFEST_HEADER: [&str; 6] = [
    "batch_name",
    "rows_in_batch",
    "raw_path",
    "checksum",
    "commit_id",
    "recorded_at",
];

/// One ledger row describing an ingested batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Batch file name as it arrived (e.g. `batch_01.csv`)
    pub batch_name: String,

    /// Rows in the batch's raw copy
    pub rows_in_batch: usize,

    /// Path of the immutable raw copy in bronze
    pub raw_path: String,

    /// Content checksum of the raw copy (empty when unavailable)
    pub checksum: String,

    /// Revision identifier at record time (empty when unavailable)
    pub commit_id: String,

    /// When the entry was recorded
    pub recorded_at: DateTime<Utc>,
}

/// Reader/writer for the manifest ledger
#[derive(Debug, Clone, Copy)]
pub struct Manifest;

impl Manifest {
    /// Create the manifest with its header if it does not exist yet
    pub fn ensure(path: &Path) -> CoreResult<()> {
        if path.exists() && std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false) {
            return Ok(());
        }
        ensure_parent(path)?;
        let mut wtr = csv::Writer::from_path(path).map_err(|e| CoreError::csv(path, e))?;
        wtr.write_record(MANIFEST_HEADER)
            .map_err(|e| CoreError::csv(path, e))?;
        wtr.flush().map_err(|e| CoreError::io(path, e))?;
        Ok(())
    }

    /// Append one entry to the ledger, creating it first if needed
    pub fn append(path: &Path, entry: &ManifestEntry) -> CoreResult<()> {
        Self::ensure(path)?;
        let file = OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(|e| CoreError::io(path, e))?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        wtr.serialize(entry).map_err(|e| CoreError::csv(path, e))?;
        wtr.flush().map_err(|e| CoreError::io(path, e))?;
        Ok(())
    }

    /// Load all entries in ledger order
    ///
    /// A missing manifest yields an empty ledger.
    pub fn load(path: &Path) -> CoreResult<Vec<ManifestEntry>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut rdr = csv::Reader::from_path(path).map_err(|e| CoreError::csv(path, e))?;
        let mut entries = Vec::new();
        for record in rdr.deserialize() {
            let entry: ManifestEntry = record.map_err(|e| CoreError::csv(path, e))?;
            entries.push(entry);
        }
        Ok(entries)
    }
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod tests;
