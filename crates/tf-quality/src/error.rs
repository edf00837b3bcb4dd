//! Error types for tf-quality

use tf_core::CoreError;
use thiserror::Error;

/// Errors raised while evaluating quality rules
#[derive(Error, Debug)]
pub enum QualityError {
    /// Core error (missing column, IO, ...)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Q001: A contract regex failed to compile
    #[error("[Q001] Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Q002: A rule returned a mask of the wrong length
    #[error("[Q002] Rule '{rule}' produced {actual} flags for {expected} rows")]
    MaskLength {
        rule: String,
        expected: usize,
        actual: usize,
    },
}

impl QualityError {
    /// Whether this error is a schema error that must halt the pipeline
    pub fn is_schema_error(&self) -> bool {
        matches!(self, QualityError::Core(e) if e.is_schema_error())
    }
}

/// Result type alias for QualityError
pub type QualityResult<T> = Result<T, QualityError>;
