//! Gold build: ML-ready projection and a reproducible train/test split

use crate::error::PipelineResult;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tf_core::{Project, Table};

/// Columns of the gold table, in output order
pub const GOLD_COLUMNS: [&str; 5] = [
    "id",
    "feature_num_scaled",
    "feature_cat_code",
    "day_of_week",
    "target",
];

/// Gold table with its train/test partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldSplit {
    pub gold: Table,
    pub train: Table,
    pub test: Table,
}

/// Project `transformed` to the gold columns and split it
///
/// `test` is a seeded random sample of `len * test_fraction` rows, rounded
/// half to even, in sample order; `train` is the complement in gold order. The same seed and
/// gold contents always produce the same split.
pub fn build(transformed: &Table, test_fraction: f64, seed: u64) -> GoldSplit {
    let gold = transformed.project(&GOLD_COLUMNS);
    let len = gold.len();
    let test_len = ((len as f64) * test_fraction).round_ties_even() as usize;
    let test_len = test_len.min(len);

    let mut rng = StdRng::seed_from_u64(seed);
    let test_idx = rand::seq::index::sample(&mut rng, len, test_len).into_vec();

    let mut in_test = vec![false; len];
    for &i in &test_idx {
        in_test[i] = true;
    }
    let train_idx: Vec<usize> = (0..len).filter(|&i| !in_test[i]).collect();

    GoldSplit {
        train: gold.select_rows(&train_idx),
        test: gold.select_rows(&test_idx),
        gold,
    }
}

/// Build gold, train and test from `silver/transformed_silver.csv`
///
/// Returns `Ok(None)` when the transformed silver table does not exist yet.
pub fn build_gold(project: &Project) -> PipelineResult<Option<GoldSplit>> {
    let layout = &project.layout;
    let input = layout.transformed_silver();
    if !input.exists() {
        log::info!("No transformed silver found, run transform first");
        return Ok(None);
    }

    let transformed = Table::read_csv(&input)?;
    let split = build(
        &transformed,
        project.params.test_size,
        project.params.random_seed,
    );

    split.gold.write_csv(&layout.gold())?;
    split.train.write_csv(&layout.train())?;
    split.test.write_csv(&layout.test())?;

    log::info!(
        "Built gold dataset {} (rows={}, train={}, test={})",
        layout.gold().display(),
        split.gold.len(),
        split.train.len(),
        split.test.len()
    );
    Ok(Some(split))
}

#[cfg(test)]
#[path = "gold_test.rs"]
mod tests;
