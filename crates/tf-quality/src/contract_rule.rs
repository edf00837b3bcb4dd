//! Row rule backed by a declarative column contract

use crate::error::{QualityError, QualityResult};
use crate::rule::RowRule;
use regex::Regex;
use std::collections::HashMap;
use tf_core::{is_null, parse_number, ColumnContract, ColumnTest, Table, TestType};

/// Applies every test of a [`ColumnContract`] row by row
///
/// Null handling follows schema-test semantics: only `not_null` and
/// `accepted_values` reject nulls; comparisons against a null pass.
/// Numeric tests reject values that are present but not numeric.
pub struct ContractRule {
    tests: Vec<ColumnTest>,
}

impl ContractRule {
    pub fn new(contract: &ColumnContract) -> Self {
        Self {
            tests: contract.tests(),
        }
    }
}

impl RowRule for ContractRule {
    fn name(&self) -> &str {
        "contract"
    }

    fn evaluate(&self, table: &Table) -> QualityResult<Vec<bool>> {
        let mut mask = vec![true; table.len()];
        for test in &self.tests {
            let values = table.column(&test.column)?;
            let passed = evaluate_test(&test.test_type, &values)?;
            for (flag, ok) in mask.iter_mut().zip(passed) {
                *flag &= ok;
            }
            log::debug!("contract test {} on '{}' evaluated", test.test_type, test.column);
        }
        Ok(mask)
    }
}

fn evaluate_test(test_type: &TestType, values: &[&str]) -> QualityResult<Vec<bool>> {
    let numeric = |check: &dyn Fn(f64) -> bool| -> Vec<bool> {
        values
            .iter()
            .map(|v| is_null(v) || parse_number(v).is_some_and(check))
            .collect()
    };

    let flags = match test_type {
        TestType::NotNull => values.iter().map(|v| !is_null(v)).collect(),
        TestType::Unique => {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for v in values.iter().filter(|v| !is_null(v)) {
                *counts.entry(v.trim()).or_insert(0) += 1;
            }
            values
                .iter()
                .map(|v| is_null(v) || counts[v.trim()] == 1)
                .collect()
        }
        TestType::Positive => numeric(&|n| n > 0.0),
        TestType::NonNegative => numeric(&|n| n >= 0.0),
        TestType::MinValue { value } => numeric(&|n| n >= *value),
        TestType::MaxValue { value } => numeric(&|n| n <= *value),
        TestType::AcceptedValues { values: allowed } => values
            .iter()
            .map(|v| !is_null(v) && is_accepted(v, allowed))
            .collect(),
        TestType::Regex { pattern } => {
            let re = Regex::new(pattern).map_err(|e| QualityError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            values
                .iter()
                .map(|v| is_null(v) || re.is_match(v.trim()))
                .collect()
        }
    };
    Ok(flags)
}

/// Text match, or numeric match when both sides are numbers
fn is_accepted(value: &str, allowed: &[String]) -> bool {
    let trimmed = value.trim();
    let as_number = parse_number(trimmed);
    allowed.iter().any(|a| {
        a == trimmed
            || matches!((as_number, parse_number(a)), (Some(x), Some(y)) if x == y)
    })
}
