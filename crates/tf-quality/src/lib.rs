//! tf-quality - Row-level quality gate for Tierflow
//!
//! Bronze rows pass through a [`SilverValidator`], which ANDs the flags of a
//! set of [`RowRule`]s. The standard rules cover nulls, types, uniqueness,
//! time continuity and value ranges; an optional column contract can add
//! further checks.

pub mod contract_rule;
pub mod error;
pub mod rule;
pub mod rules;
pub mod validator;

pub use contract_rule::ContractRule;
pub use error::{QualityError, QualityResult};
pub use rule::{BestEffort, RowRule};
pub use validator::{validate_rows, RuleOutcome, SilverValidator, ValidationReport};
