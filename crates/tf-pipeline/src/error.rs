//! Error types for tf-pipeline

use tf_core::CoreError;
use tf_quality::QualityError;
use thiserror::Error;

/// Errors that stop a pipeline stage or simulation
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Core error (params, IO, CSV, missing column)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Quality gate error
    #[error(transparent)]
    Quality(#[from] QualityError),

    /// P001: Source table for the simulator does not exist
    #[error("[P001] Source file not found: {path}")]
    SourceNotFound { path: String },

    /// P002: Batch count must be at least one
    #[error("[P002] Invalid batch count {count}: must be at least 1")]
    InvalidBatchCount { count: usize },

    /// P003: External tool could not be started
    #[error("[P003] '{tool}' is not available: {message}")]
    ToolUnavailable { tool: String, message: String },

    /// P004: External tool ran but failed
    #[error("[P004] '{tool}' failed: {message}")]
    ToolFailed { tool: String, message: String },

    /// P005: Glob pattern for the inbox is invalid
    #[error("[P005] Invalid inbox pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// P006: Dataset for data versioning not found
    #[error("[P006] Dataset file not found: {path}")]
    DatasetNotFound { path: String },
}

impl PipelineError {
    /// Whether this is a schema error (required column missing)
    pub fn is_schema_error(&self) -> bool {
        match self {
            PipelineError::Core(e) => e.is_schema_error(),
            PipelineError::Quality(e) => e.is_schema_error(),
            _ => false,
        }
    }
}

/// Result type alias for PipelineError
pub type PipelineResult<T> = Result<T, PipelineError>;
