//! Batch splitting and synthetic batch generation

use crate::error::{PipelineError, PipelineResult};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tf_core::{format_timestamp, is_null, parse_number, parse_timestamp, Project, Table};

/// Columns of a synthesized batch, in file order
pub const BATCH_COLUMNS: [&str; 5] = ["id", "feature_num", "feature_cat", "target", "timestamp"];

/// Categories and their sampling weights
const CATEGORIES: [(&str, f64); 3] = [("A", 0.5), ("B", 0.3), ("C", 0.2)];

const FEATURE_MEAN: f64 = 50.0;
const FEATURE_STD_DEV: f64 = 15.0;

/// File name of the batch at a 1-based position
pub fn batch_file_name(position: usize) -> String {
    format!("batch_{:02}.csv", position)
}

/// Sizes of `n` batches covering `total` rows
///
/// The first `total % n` batches get one extra row, so sizes differ by at
/// most one and always sum to `total`.
pub fn batch_sizes(total: usize, n: usize) -> PipelineResult<Vec<usize>> {
    if n == 0 {
        return Err(PipelineError::InvalidBatchCount { count: n });
    }
    let base = total / n;
    let rem = total % n;
    Ok((0..n).map(|i| base + usize::from(i < rem)).collect())
}

/// Split a table into `n` batches in arrival order
///
/// Rows are ordered by `timestamp` when that column exists, otherwise by
/// `id`, otherwise kept in input order. Values that cannot be parsed sort
/// last, and ties keep their input order. An empty table still yields `n`
/// (empty) batches.
pub fn split_into_batches(table: &Table, n: usize) -> PipelineResult<Vec<Table>> {
    let sizes = batch_sizes(table.len(), n)?;
    let order = arrival_order(table)?;

    let mut batches = Vec::with_capacity(n);
    let mut start = 0;
    for size in sizes {
        batches.push(table.select_rows(&order[start..start + size]));
        start += size;
    }
    Ok(batches)
}

fn arrival_order(table: &Table) -> PipelineResult<Vec<usize>> {
    let mut order: Vec<usize> = (0..table.len()).collect();

    if table.has_column("timestamp") {
        let keys: Vec<Option<NaiveDateTime>> = table
            .column("timestamp")?
            .into_iter()
            .map(parse_timestamp)
            .collect();
        order.sort_by(|&a, &b| missing_last(keys[a].as_ref(), keys[b].as_ref(), Ord::cmp));
    } else if table.has_column("id") {
        let ids = table.column("id")?;
        let numeric = ids
            .iter()
            .filter(|v| !is_null(v))
            .all(|v| parse_number(v).is_some());
        if numeric {
            let keys: Vec<Option<f64>> = ids.iter().map(|v| parse_number(v)).collect();
            order.sort_by(|&a, &b| {
                missing_last(keys[a].as_ref(), keys[b].as_ref(), |x, y| x.total_cmp(y))
            });
        } else {
            let keys: Vec<Option<&str>> = ids
                .iter()
                .map(|v| (!is_null(v)).then(|| v.trim()))
                .collect();
            order.sort_by(|&a, &b| missing_last(keys[a].as_ref(), keys[b].as_ref(), Ord::cmp));
        }
    }
    Ok(order)
}

fn missing_last<T>(a: Option<&T>, b: Option<&T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Write batches as `batch_01.csv`, `batch_02.csv`, ... into `dir`
///
/// Empty batches are written header-only. Returns the written paths in
/// batch order.
pub fn write_batches(batches: &[Table], dir: &Path) -> PipelineResult<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(batches.len());
    for (i, batch) in batches.iter().enumerate() {
        let path = dir.join(batch_file_name(i + 1));
        batch.write_csv(&path)?;
        log::debug!("Wrote {} ({} rows)", path.display(), batch.len());
        paths.push(path);
    }
    Ok(paths)
}

/// Synthesize a reproducible raw dataset
///
/// `id` counts from 1, `feature_num` is normally distributed around 50 and
/// rounded to 3 decimals, `feature_cat` is drawn from A/B/C with weights
/// 0.5/0.3/0.2, `target` is 0 or 1, and timestamps advance one minute per
/// row from 2024-01-01 00:00:00.
pub fn synthesize(total_rows: usize, seed: u64) -> Table {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = synthetic_epoch();
    let mut table = Table::new(BATCH_COLUMNS.iter().map(|c| c.to_string()).collect());

    for i in 0..total_rows {
        let feature = sample_normal(&mut rng, FEATURE_MEAN, FEATURE_STD_DEV);
        let feature = (feature * 1000.0).round() / 1000.0;
        let target: u8 = rng.gen_range(0..2);
        let ts = start + Duration::minutes(i as i64);
        table.push_row(vec![
            (i + 1).to_string(),
            feature.to_string(),
            sample_category(&mut rng).to_string(),
            target.to_string(),
            format_timestamp(&ts),
        ]);
    }
    table
}

fn synthetic_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Box-Muller transform
fn sample_normal(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

fn sample_category(rng: &mut StdRng) -> &'static str {
    let draw: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (name, weight) in CATEGORIES {
        cumulative += weight;
        if draw < cumulative {
            return name;
        }
    }
    CATEGORIES[CATEGORIES.len() - 1].0
}

/// Result of generating synthetic batches
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub files: Vec<PathBuf>,
    pub total_rows: usize,
}

/// Synthesize `n_batches * rows_per_batch` rows into the arrival inbox
pub fn generate(project: &Project) -> PipelineResult<GenerateOutcome> {
    let params = &project.params;
    let total_rows = params.n_batches * params.rows_per_batch;
    let data = synthesize(total_rows, params.random_seed);
    let batches = split_into_batches(&data, params.n_batches)?;

    let incoming = project.layout.incoming_dir();
    let files = write_batches(&batches, &incoming)?;
    log::info!(
        "Generated {} batches ({} rows) in {}",
        files.len(),
        total_rows,
        incoming.display()
    );
    Ok(GenerateOutcome { files, total_rows })
}

#[cfg(test)]
#[path = "splitter_test.rs"]
mod tests;
