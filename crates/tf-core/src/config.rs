//! Project parameters parsed from params.yaml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default params file name at the project root
pub const PARAMS_FILE: &str = "params.yaml";

/// Columns every bronze table must carry
pub const DEFAULT_REQUIRED_COLUMNS: [&str; 5] =
    ["id", "feature_num", "feature_cat", "target", "timestamp"];

/// Pipeline parameters from params.yaml
///
/// Every field has a default so a missing file, or a file that sets only a
/// few keys, still yields a complete parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Params {
    /// Fraction of gold rows sampled into the test split
    #[serde(default = "default_test_size")]
    pub test_size: f64,

    /// Seed for the train/test split and synthetic data
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,

    /// Number of batches to generate or simulate
    #[serde(default = "default_n_batches")]
    pub n_batches: usize,

    /// Rows per synthesized batch
    #[serde(default = "default_rows_per_batch")]
    pub rows_per_batch: usize,

    /// Columns that must exist in bronze data
    #[serde(default = "default_required_columns")]
    pub required_columns: Vec<String>,

    /// Accepted range for `feature_num`
    #[serde(default)]
    pub feature_num_range: ValueRange,

    /// Multiple of the observed cadence beyond which a gap is rejected
    #[serde(default = "default_gap_factor")]
    pub gap_factor: f64,

    /// Root directory of the tiered data layout, relative to the project
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Optional column contract, relative to the project
    #[serde(default = "default_contract_path")]
    pub contract_path: String,
}

/// Inclusive numeric bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ValueRange {
    fn default() -> Self {
        Self {
            min: -100.0,
            max: 200.0,
        }
    }
}

impl ValueRange {
    /// Whether `value` lies within the bounds (inclusive)
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

fn default_test_size() -> f64 {
    0.2
}

fn default_random_seed() -> u64 {
    42
}

fn default_n_batches() -> usize {
    5
}

fn default_rows_per_batch() -> usize {
    100
}

fn default_required_columns() -> Vec<String> {
    DEFAULT_REQUIRED_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_gap_factor() -> f64 {
    3.0
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_contract_path() -> String {
    "contract.yml".to_string()
}

impl Default for Params {
    fn default() -> Self {
        Self {
            test_size: default_test_size(),
            random_seed: default_random_seed(),
            n_batches: default_n_batches(),
            rows_per_batch: default_rows_per_batch(),
            required_columns: default_required_columns(),
            feature_num_range: ValueRange::default(),
            gap_factor: default_gap_factor(),
            data_dir: default_data_dir(),
            contract_path: default_contract_path(),
        }
    }
}

impl Params {
    /// Load params from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ParamsNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let params = Self::from_yaml(&content).map_err(|e| match e {
            CoreError::YamlParse(inner) => CoreError::ParamsParseError {
                path: path.display().to_string(),
                message: inner.to_string(),
            },
            other => other,
        })?;
        Ok(params)
    }

    /// Load params.yaml from a project directory, falling back to defaults
    /// when the file is absent
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let path = dir.join(PARAMS_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            log::debug!("No {} in {}, using defaults", PARAMS_FILE, dir.display());
            Ok(Self::default())
        }
    }

    /// Parse and validate params from YAML text
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let params: Params = if content.trim().is_empty() {
            Params::default()
        } else {
            serde_yaml::from_str(content)?
        };
        params.validate()?;
        Ok(params)
    }

    /// Validate the parameter values
    fn validate(&self) -> CoreResult<()> {
        if !(0.0..=1.0).contains(&self.test_size) {
            return Err(CoreError::ParamsInvalid {
                message: format!("test_size must be within [0, 1], got {}", self.test_size),
            });
        }

        if self.n_batches == 0 {
            return Err(CoreError::ParamsInvalid {
                message: "n_batches must be at least 1".to_string(),
            });
        }

        if self.required_columns.is_empty() {
            return Err(CoreError::ParamsInvalid {
                message: "required_columns cannot be empty".to_string(),
            });
        }

        let range = self.feature_num_range;
        if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
            return Err(CoreError::ParamsInvalid {
                message: format!(
                    "feature_num_range must be finite with min <= max, got [{}, {}]",
                    range.min, range.max
                ),
            });
        }

        if !self.gap_factor.is_finite() || self.gap_factor <= 0.0 {
            return Err(CoreError::ParamsInvalid {
                message: format!("gap_factor must be positive, got {}", self.gap_factor),
            });
        }

        if self.data_dir.trim().is_empty() {
            return Err(CoreError::ParamsInvalid {
                message: "data_dir cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Absolute data root for a project directory
    pub fn data_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.data_dir)
    }

    /// Absolute contract path for a project directory
    pub fn contract_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.contract_path)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
