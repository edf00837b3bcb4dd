//! Silver transformation: derive model features from validated rows

use crate::error::PipelineResult;
use chrono::Datelike;
use std::collections::BTreeSet;
use tf_core::{format_timestamp, is_null, parse_number, parse_timestamp, Project, Table};

/// Add derived feature columns to a validated table
///
/// * `timestamp` is re-rendered in canonical form (left as-is if unparseable)
/// * `day_of_week`: Monday = 0 through Sunday = 6, `-1` when unparseable
/// * `feature_cat_code`: position in the sorted distinct categories, `-1` for null
/// * `feature_num_scaled`: min-max scaled into [0, 1], `0` when constant
///
/// Output rows correspond one-to-one with input rows.
pub fn transform_table(table: &Table) -> PipelineResult<Table> {
    let mut out = table.clone();

    let timestamps: Vec<_> = table
        .column("timestamp")?
        .into_iter()
        .map(|v| (v, parse_timestamp(v)))
        .collect();
    out.set_column(
        "timestamp",
        timestamps
            .iter()
            .map(|(raw, ts)| ts.map_or_else(|| raw.to_string(), |t| format_timestamp(&t)))
            .collect(),
    );
    out.set_column(
        "day_of_week",
        timestamps
            .iter()
            .map(|(_, ts)| {
                ts.map_or(-1, |t| t.weekday().num_days_from_monday() as i64)
                    .to_string()
            })
            .collect(),
    );

    out.set_column("feature_cat_code", category_codes(&table.column("feature_cat")?));
    out.set_column("feature_num_scaled", min_max_scaled(&table.column("feature_num")?));
    Ok(out)
}

fn category_codes(values: &[&str]) -> Vec<String> {
    let categories: BTreeSet<&str> = values
        .iter()
        .filter(|v| !is_null(v))
        .map(|v| v.trim())
        .collect();
    let sorted: Vec<&str> = categories.into_iter().collect();

    values
        .iter()
        .map(|v| {
            if is_null(v) {
                return "-1".to_string();
            }
            sorted
                .binary_search(&v.trim())
                .map_or(-1, |i| i as i64)
                .to_string()
        })
        .collect()
}

fn min_max_scaled(values: &[&str]) -> Vec<String> {
    let numbers: Vec<Option<f64>> = values.iter().map(|v| parse_number(v)).collect();
    let (min, max) = numbers
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &n| {
            (lo.min(n), hi.max(n))
        });

    if !min.is_finite() || !max.is_finite() || min == max {
        return vec!["0".to_string(); values.len()];
    }
    numbers
        .iter()
        .map(|n| match n {
            Some(n) => ((n - min) / (max - min)).clamp(0.0, 1.0).to_string(),
            None => String::new(),
        })
        .collect()
}

/// Transform `silver/silver_all.csv` into `silver/transformed_silver.csv`
///
/// Returns the number of rows written, or `Ok(None)` when there is no
/// validated silver table yet.
pub fn transform_silver(project: &Project) -> PipelineResult<Option<usize>> {
    let layout = &project.layout;
    let input = layout.silver_all();
    if !input.exists() {
        log::info!("No validated silver dataset found, run validate first");
        return Ok(None);
    }

    let silver = Table::read_csv(&input)?;
    let transformed = transform_table(&silver)?;
    transformed.write_csv(&layout.transformed_silver())?;
    log::info!(
        "Wrote transformed silver to {} ({} rows)",
        layout.transformed_silver().display(),
        transformed.len()
    );
    Ok(Some(transformed.len()))
}

#[cfg(test)]
#[path = "transform_test.rs"]
mod tests;
