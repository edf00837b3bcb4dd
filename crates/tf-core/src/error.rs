//! Error types for tf-core

use thiserror::Error;

/// Core error type for Tierflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Params file not found
    #[error("[E001] Params file not found: {path}")]
    ParamsNotFound { path: String },

    /// E002: Failed to parse params file
    #[error("[E002] Failed to parse params {path}: {message}")]
    ParamsParseError { path: String, message: String },

    /// E003: Invalid params value
    #[error("[E003] Invalid params: {message}")]
    ParamsInvalid { message: String },

    /// E004: Project directory not found
    #[error("[E004] Project directory not found: {path}")]
    ProjectNotFound { path: String },

    /// E005: Required column absent from a table (schema error)
    #[error("[E005] Missing required column: {column}")]
    MissingColumn { column: String },

    /// E006: Contract file could not be parsed
    #[error("[E006] Failed to parse contract {path}: {message}")]
    ContractParseError { path: String, message: String },

    /// E007: CSV read/write error with file path context
    #[error("[E007] CSV error in '{path}': {source}")]
    Csv { path: String, source: csv::Error },

    /// E014: IO error
    #[error("[E014] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E016: IO error with file path context
    #[error("[E016] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E015: YAML parse error
    #[error("[E015] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Build an [`CoreError::IoWithPath`] for `path`.
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        CoreError::IoWithPath {
            path: path.display().to_string(),
            source,
        }
    }

    /// Build a [`CoreError::Csv`] for `path`.
    pub fn csv(path: &std::path::Path, source: csv::Error) -> Self {
        CoreError::Csv {
            path: path.display().to_string(),
            source,
        }
    }

    /// Whether this error is a schema error that must halt the pipeline.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, CoreError::MissingColumn { .. })
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
