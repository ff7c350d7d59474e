//! Error taxonomy for the analysis core.
//!
//! `ConfigurationError` covers structurally invalid arguments and is always raised
//! before any data is read. `DataError` covers windows that cannot support a
//! well-defined statistic. Numeric degeneracy (a constant stream, a single-row window)
//! is not an error: it surfaces as a NaN score.

use thiserror::Error;

/// Caller-supplied arguments are structurally invalid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("insufficient streams: required at least {required}, got {got}")]
    InsufficientStreams { required: usize, got: usize },

    #[error("duplicate stream: '{0}' requested more than once")]
    DuplicateStream(String),

    #[error("unknown stream: '{0}' is not a column of the series table")]
    UnknownStream(String),

    #[error("unknown strategy: '{0}' (expected correlation, volatility or central-tendency)")]
    UnknownStrategy(String),

    #[error("invalid timestamp: '{0}'")]
    InvalidTimestamp(String),
}

/// The data cannot support a well-defined statistic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("no observations in window")]
    EmptyWindow,

    #[error("insufficient scores for threshold: required {required} finite, got {got}")]
    InsufficientScores { required: usize, got: usize },
}

/// Any failure of one analysis invocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Data(#[from] DataError),
}

impl AnalysisError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, AnalysisError::Configuration(_))
    }

    pub fn is_data(&self) -> bool {
        matches!(self, AnalysisError::Data(_))
    }
}

/// Series table construction failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("column '{column}' has {got} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("duplicate column: '{0}'")]
    DuplicateColumn(String),

    #[error("time column '{column}' must be in chronological order (row {row} goes backwards)")]
    OutOfOrder { column: String, row: usize },
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_streams_display() {
        let error = ConfigurationError::InsufficientStreams { required: 3, got: 2 };
        assert_eq!(
            error.to_string(),
            "insufficient streams: required at least 3, got 2"
        );
    }

    #[test]
    fn test_empty_window_display() {
        assert_eq!(DataError::EmptyWindow.to_string(), "no observations in window");
    }

    #[test]
    fn test_analysis_error_is_transparent() {
        let error: AnalysisError = ConfigurationError::UnknownStrategy("median".into()).into();
        assert!(error.is_configuration());
        assert!(!error.is_data());
        assert!(error.to_string().starts_with("unknown strategy: 'median'"));

        let error: AnalysisError = DataError::EmptyWindow.into();
        assert!(error.is_data());
    }

    #[test]
    fn test_errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AnalysisError>();
        assert_send_sync::<TableError>();
    }
}
