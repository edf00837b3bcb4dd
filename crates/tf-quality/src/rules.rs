//! Core quality rules for bronze rows

use crate::error::QualityResult;
use crate::rule::RowRule;
use chrono::{NaiveDateTime, Timelike};
use std::collections::HashMap;
use tf_core::timestamp::format_timestamp;
use tf_core::{is_null, parse_number, parse_timestamp, Table, ValueRange};

/// Every listed column must be non-null
pub struct NotNullRule {
    columns: Vec<String>,
}

impl NotNullRule {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

impl RowRule for NotNullRule {
    fn name(&self) -> &str {
        "not_null"
    }

    fn evaluate(&self, table: &Table) -> QualityResult<Vec<bool>> {
        let mut mask = vec![true; table.len()];
        for column in &self.columns {
            for (flag, value) in mask.iter_mut().zip(table.column(column)?) {
                *flag &= !is_null(value);
            }
        }
        Ok(mask)
    }
}

/// The column must parse as a number
pub struct NumericRule {
    name: String,
    column: String,
}

impl NumericRule {
    pub fn new(column: &str) -> Self {
        Self {
            name: format!("{}_numeric", column),
            column: column.to_string(),
        }
    }
}

impl RowRule for NumericRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, table: &Table) -> QualityResult<Vec<bool>> {
        Ok(table
            .column(&self.column)?
            .into_iter()
            .map(|v| parse_number(v).is_some())
            .collect())
    }
}

/// The column must hold one of a fixed set of numeric values
///
/// Values compare numerically, so `1`, `1.0` and ` 1 ` all match `1`.
pub struct AllowedNumbersRule {
    name: String,
    column: String,
    allowed: Vec<f64>,
}

impl AllowedNumbersRule {
    pub fn new(column: &str, allowed: Vec<f64>) -> Self {
        Self {
            name: format!("{}_allowed_values", column),
            column: column.to_string(),
            allowed,
        }
    }

    /// `target` ∈ {0, 1}
    pub fn binary_target() -> Self {
        Self::new("target", vec![0.0, 1.0])
    }
}

impl RowRule for AllowedNumbersRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, table: &Table) -> QualityResult<Vec<bool>> {
        Ok(table
            .column(&self.column)?
            .into_iter()
            .map(|v| parse_number(v).is_some_and(|n| self.allowed.contains(&n)))
            .collect())
    }
}

/// The column must parse as a date-time
pub struct TimestampRule {
    name: String,
    column: String,
}

impl TimestampRule {
    pub fn new(column: &str) -> Self {
        Self {
            name: format!("{}_parseable", column),
            column: column.to_string(),
        }
    }
}

impl RowRule for TimestampRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, table: &Table) -> QualityResult<Vec<bool>> {
        Ok(table
            .column(&self.column)?
            .into_iter()
            .map(|v| parse_timestamp(v).is_some())
            .collect())
    }
}

/// How values are compared for uniqueness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    /// Integers compare exactly, other numbers by value, everything else
    /// by trimmed text
    Value,
    /// Parseable timestamps compare by instant, everything else by trimmed text
    Timestamp,
}

/// Values must be unique across the whole table
///
/// Every copy of a duplicated value is rejected, not just the extras.
/// All null values count as the same value.
pub struct UniqueRule {
    name: String,
    column: String,
    key: UniqueKey,
}

impl UniqueRule {
    pub fn new(column: &str, key: UniqueKey) -> Self {
        Self {
            name: format!("{}_unique", column),
            column: column.to_string(),
            key,
        }
    }

    fn normalize(&self, value: &str) -> String {
        if is_null(value) {
            return String::new();
        }
        match self.key {
            UniqueKey::Value => {
                numeric_key(value).unwrap_or_else(|| value.trim().to_string())
            }
            UniqueKey::Timestamp => match parse_timestamp(value) {
                Some(ts) => format_timestamp_precise(&ts),
                None => value.trim().to_string(),
            },
        }
    }
}

/// Comparison key for a numeric cell
///
/// Integers compare exactly (ids beyond 2^53 stay distinct); whole floats
/// such as `7.0` share the key of the integer they equal.
fn numeric_key(value: &str) -> Option<String> {
    if let Ok(n) = value.trim().parse::<i128>() {
        return Some(n.to_string());
    }
    let n = parse_number(value)?;
    if n.fract() == 0.0 && n.abs() < i128::MAX as f64 {
        Some((n as i128).to_string())
    } else {
        Some(n.to_string())
    }
}

fn format_timestamp_precise(ts: &NaiveDateTime) -> String {
    format!("{}.{:09}", format_timestamp(ts), ts.nanosecond())
}

impl RowRule for UniqueRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, table: &Table) -> QualityResult<Vec<bool>> {
        let keys: Vec<String> = table
            .column(&self.column)?
            .into_iter()
            .map(|v| self.normalize(v))
            .collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for key in &keys {
            *counts.entry(key.as_str()).or_insert(0) += 1;
        }

        Ok(keys.iter().map(|k| counts[k.as_str()] == 1).collect())
    }
}

/// Rejects rows that arrive after an unusually large time gap
///
/// Parseable timestamps are sorted; the smallest positive gap between
/// neighbours is the expected cadence. A row whose gap from its predecessor
/// exceeds `factor` times the cadence is rejected. Rows with unparseable
/// timestamps are ignored here (the timestamp rule rejects them).
pub struct ContinuityRule {
    column: String,
    factor: f64,
}

impl ContinuityRule {
    pub fn new(column: &str, factor: f64) -> Self {
        Self {
            column: column.to_string(),
            factor,
        }
    }
}

impl RowRule for ContinuityRule {
    fn name(&self) -> &str {
        "continuity"
    }

    fn evaluate(&self, table: &Table) -> QualityResult<Vec<bool>> {
        let mut mask = vec![true; table.len()];

        let mut parsed: Vec<(NaiveDateTime, usize)> = table
            .column(&self.column)?
            .into_iter()
            .enumerate()
            .filter_map(|(i, v)| parse_timestamp(v).map(|ts| (ts, i)))
            .collect();
        parsed.sort();

        // (row index of the later row, gap in microseconds)
        let gaps: Vec<(usize, i64)> = parsed
            .windows(2)
            .map(|w| {
                let gap = (w[1].0 - w[0].0).num_microseconds().unwrap_or(i64::MAX);
                (w[1].1, gap)
            })
            .collect();

        let Some(cadence) = gaps.iter().map(|(_, g)| *g).filter(|g| *g > 0).min() else {
            return Ok(mask);
        };

        let limit = self.factor * cadence as f64;
        for (idx, gap) in gaps {
            if gap as f64 > limit {
                mask[idx] = false;
            }
        }
        Ok(mask)
    }
}

/// Numeric values must lie within an inclusive range
///
/// Non-numeric values pass; the numeric rule is responsible for them.
pub struct RangeRule {
    name: String,
    column: String,
    range: ValueRange,
}

impl RangeRule {
    pub fn new(column: &str, range: ValueRange) -> Self {
        Self {
            name: format!("{}_range", column),
            column: column.to_string(),
            range,
        }
    }
}

impl RowRule for RangeRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, table: &Table) -> QualityResult<Vec<bool>> {
        Ok(table
            .column(&self.column)?
            .into_iter()
            .map(|v| parse_number(v).map_or(true, |n| self.range.contains(n)))
            .collect())
    }
}

#[cfg(test)]
#[path = "rules_test.rs"]
mod tests;
