//! Declarative column contract (contract.yml)
//!
//! A contract lists columns and the checks each must satisfy:
//!
//! ```yaml
//! columns:
//!   - name: id
//!     tests:
//!       - positive
//!   - name: feature_cat
//!     tests:
//!       - accepted_values:
//!           values: [A, B, C]
//! ```
//!
//! The contract is an optional layer on top of the core quality rules. It
//! can only reject more rows.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// A parsed column contract
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnContract {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub columns: Vec<ContractColumn>,
}

/// A column and the checks declared for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractColumn {
    pub name: String,

    #[serde(default)]
    pub tests: Vec<ContractTest>,
}

/// One entry of a column's `tests` list, as written in YAML
///
/// Either a bare name (`- unique`) or a single-key map carrying arguments
/// (`- min_value: {value: 0}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContractTest {
    Named(String),
    WithArgs(HashMap<String, TestArgs>),
}

/// Arguments a contract test may carry; each test reads only its own key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestArgs {
    #[serde(default)]
    pub values: Vec<Value>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub pattern: Option<String>,
}

/// A resolved contract check
#[derive(Debug, Clone, PartialEq)]
pub enum TestType {
    Unique,
    NotNull,
    /// Strictly greater than zero
    Positive,
    NonNegative,
    AcceptedValues { values: Vec<String> },
    MinValue { value: f64 },
    MaxValue { value: f64 },
    Regex { pattern: String },
}

impl TestType {
    /// Resolve a YAML test entry; `None` for unknown names or missing
    /// arguments
    pub fn resolve(test: &ContractTest) -> Option<Self> {
        match test {
            ContractTest::Named(name) => match name.as_str() {
                "unique" => Some(Self::Unique),
                "not_null" => Some(Self::NotNull),
                "positive" => Some(Self::Positive),
                "non_negative" => Some(Self::NonNegative),
                _ => None,
            },
            ContractTest::WithArgs(map) => {
                let (name, args) = map.iter().next()?;
                Self::resolve_with_args(name, args)
            }
        }
    }

    fn resolve_with_args(name: &str, args: &TestArgs) -> Option<Self> {
        Some(match name {
            "accepted_values" => {
                let values: Vec<String> = args.values.iter().filter_map(scalar_text).collect();
                if values.is_empty() {
                    return None;
                }
                Self::AcceptedValues { values }
            }
            "min_value" => Self::MinValue { value: args.value? },
            "max_value" => Self::MaxValue { value: args.value? },
            "regex" => Self::Regex {
                pattern: args.pattern.clone()?,
            },
            _ => return None,
        })
    }
}

/// Text form of a YAML scalar; sequences, maps and nulls have none
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unique => "unique",
            Self::NotNull => "not_null",
            Self::Positive => "positive",
            Self::NonNegative => "non_negative",
            Self::AcceptedValues { .. } => "accepted_values",
            Self::MinValue { .. } => "min_value",
            Self::MaxValue { .. } => "max_value",
            Self::Regex { .. } => "regex",
        };
        f.write_str(name)
    }
}

/// A check bound to the column it applies to
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnTest {
    pub column: String,
    pub test_type: TestType,
}

impl ColumnContract {
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        Self::from_yaml(&content).map_err(|e| CoreError::ContractParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load a contract if the file exists and parses
    ///
    /// Absence returns `None` silently; a broken file is logged and treated
    /// as absent.
    pub fn load_optional(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        Self::load(path)
            .map_err(|e| log::warn!("Ignoring contract: {}", e))
            .ok()
    }

    /// Every recognised check in declaration order
    ///
    /// Unknown entries are skipped with a warning.
    pub fn tests(&self) -> Vec<ColumnTest> {
        self.columns
            .iter()
            .flat_map(|column| {
                column.tests.iter().filter_map(move |test| {
                    let resolved = TestType::resolve(test);
                    if resolved.is_none() {
                        log::warn!(
                            "Unrecognised contract test on column '{}': {:?}",
                            column.name,
                            test
                        );
                    }
                    resolved.map(|test_type| ColumnTest {
                        column: column.name.clone(),
                        test_type,
                    })
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "contract_test.rs"]
mod tests;
