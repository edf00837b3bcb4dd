//! Silver validator: combines row rules into one accept/reject mask

use crate::contract_rule::ContractRule;
use crate::error::{QualityError, QualityResult};
use crate::rule::{BestEffort, RowRule};
use crate::rules::{
    AllowedNumbersRule, ContinuityRule, NotNullRule, NumericRule, RangeRule, TimestampRule,
    UniqueKey, UniqueRule,
};
use tf_core::{ColumnContract, Params, Table};

/// Rows rejected by a single rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub rule: String,
    pub rejected: usize,
}

/// Result of validating a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// `true` for each accepted row, aligned with the input rows
    pub mask: Vec<bool>,

    /// Per-rule rejection counts; a row rejected by several rules is
    /// counted once per rule
    pub rule_rejections: Vec<RuleOutcome>,
}

impl ValidationReport {
    pub fn accepted_count(&self) -> usize {
        self.mask.iter().filter(|&&ok| ok).count()
    }

    pub fn rejected_count(&self) -> usize {
        self.mask.len() - self.accepted_count()
    }
}

/// Row-level quality gate applied to bronze data
pub struct SilverValidator {
    required_columns: Vec<String>,
    rules: Vec<Box<dyn RowRule>>,
}

impl SilverValidator {
    /// Validator with no rules beyond the required-column check
    pub fn new(required_columns: Vec<String>) -> Self {
        Self {
            required_columns,
            rules: Vec::new(),
        }
    }

    /// Add a rule; all rules are combined with logical AND
    pub fn with_rule(mut self, rule: Box<dyn RowRule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// The standard rule set, plus the contract when one is configured
    pub fn standard(params: &Params, contract: Option<&ColumnContract>) -> Self {
        let mut validator = Self::new(params.required_columns.clone())
            .with_rule(Box::new(NotNullRule::new(params.required_columns.clone())))
            .with_rule(Box::new(NumericRule::new("feature_num")))
            .with_rule(Box::new(AllowedNumbersRule::binary_target()))
            .with_rule(Box::new(TimestampRule::new("timestamp")))
            .with_rule(Box::new(UniqueRule::new("id", UniqueKey::Value)))
            .with_rule(Box::new(UniqueRule::new("timestamp", UniqueKey::Timestamp)))
            .with_rule(Box::new(ContinuityRule::new("timestamp", params.gap_factor)))
            .with_rule(Box::new(RangeRule::new(
                "feature_num",
                params.feature_num_range,
            )));

        if let Some(contract) = contract {
            validator = validator.with_rule(Box::new(BestEffort::new(ContractRule::new(contract))));
        }
        validator
    }

    /// Evaluate every rule against `table`
    ///
    /// A missing required column is a schema error and aborts validation
    /// before any rule runs.
    pub fn validate(&self, table: &Table) -> QualityResult<ValidationReport> {
        for column in &self.required_columns {
            table.require_column(column)?;
        }

        let mut mask = vec![true; table.len()];
        let mut rule_rejections = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let flags = rule.evaluate(table)?;
            if flags.len() != table.len() {
                return Err(QualityError::MaskLength {
                    rule: rule.name().to_string(),
                    expected: table.len(),
                    actual: flags.len(),
                });
            }

            let rejected = flags.iter().filter(|&&ok| !ok).count();
            log::debug!("Rule '{}' rejected {} row(s)", rule.name(), rejected);
            rule_rejections.push(RuleOutcome {
                rule: rule.name().to_string(),
                rejected,
            });

            for (flag, ok) in mask.iter_mut().zip(flags) {
                *flag &= ok;
            }
        }

        Ok(ValidationReport {
            mask,
            rule_rejections,
        })
    }
}

/// Validate with the default rule set and the given required columns
pub fn validate_rows(table: &Table, required_columns: &[String]) -> QualityResult<Vec<bool>> {
    let params = Params {
        required_columns: required_columns.to_vec(),
        ..Params::default()
    };
    Ok(SilverValidator::standard(&params, None)
        .validate(table)?
        .mask)
}

#[cfg(test)]
#[path = "validator_test.rs"]
mod tests;
