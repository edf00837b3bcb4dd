//! Row rule abstraction
//!
//! A rule looks at the whole table and returns one pass flag per row. The
//! validator ANDs every rule's flags together, so a rule can only ever
//! reject rows, never rescue a row another rule rejected.

use crate::error::QualityResult;
use tf_core::Table;

/// A per-row quality check
pub trait RowRule: Send + Sync {
    /// Short identifier used in validation reports
    fn name(&self) -> &str;

    /// Evaluate the rule, returning `true` for each row that passes
    ///
    /// The returned vector must have exactly `table.len()` entries.
    fn evaluate(&self, table: &Table) -> QualityResult<Vec<bool>>;
}

/// Runs an inner rule on a best-effort basis
///
/// If the inner rule fails (for example a contract references a column that
/// does not exist), the failure is logged and the rule passes every row.
pub struct BestEffort<R> {
    inner: R,
}

impl<R: RowRule> BestEffort<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: RowRule> RowRule for BestEffort<R> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn evaluate(&self, table: &Table) -> QualityResult<Vec<bool>> {
        match self.inner.evaluate(table) {
            Ok(mask) if mask.len() == table.len() => Ok(mask),
            Ok(mask) => {
                log::warn!(
                    "Optional rule '{}' returned {} flags for {} rows; ignoring it",
                    self.inner.name(),
                    mask.len(),
                    table.len()
                );
                Ok(vec![true; table.len()])
            }
            Err(e) => {
                log::warn!("Optional rule '{}' skipped: {}", self.inner.name(), e);
                Ok(vec![true; table.len()])
            }
        }
    }
}
