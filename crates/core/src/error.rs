//! Error types for the recommender workspace.

use thiserror::Error;

/// Errors raised by matrix loading, configuration and the completion entry point.
///
/// A cell that cannot be predicted is not an error: it stays unrated in the
/// output. Degenerate similarities (zero variance or zero norm) resolve to 0.
#[derive(Debug, Error)]
pub enum RecommenderError {
    /// Unknown identifier or out-of-range parameter, detected before any computation.
    #[error("Invalid argument {param}={value:?}: expected {expected}")]
    InvalidArgument {
        param: String,
        value: String,
        expected: String,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Score {value} at ({row}, {col}) is outside the range [{min}, {max}]")]
    ScoreOutOfRange {
        row: usize,
        col: usize,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Configuration error: {message}")]
    ConfigurationError {
        message: String,
        key: Option<String>,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecommenderError {
    /// Shorthand for [`RecommenderError::InvalidArgument`].
    pub fn invalid_argument(
        param: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            param: param.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Whether the error was caused by caller input rather than the environment.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. }
                | Self::DimensionMismatch { .. }
                | Self::Parse { .. }
                | Self::ScoreOutOfRange { .. }
        )
    }
}
