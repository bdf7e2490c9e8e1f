//! Analytics error types
//!
//! Error codes:
//! - MNP_UNKNOWN_PARAMETER (client input)
//! - MNP_INVALID_BIN_WIDTH
//! - MNP_INVALID_BIN_COUNT
//! - MNP_INVALID_BIN_INDEX
//! - MNP_NON_FINITE_VALUE
//! - MNP_STORAGE_FAILED / MNP_RECORD_DECODE (from the executor)

use thiserror::Error;

use crate::executor::ExecutorError;

/// Result type for analytics operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// `parameter` does not name something the chart type can aggregate
    #[error("Unknown analysis parameter '{parameter}' for chart type {chart}")]
    UnknownParameter { parameter: String, chart: String },

    /// Float-mode bins would have zero or non-finite width
    #[error("Invalid bin width {width} for values in [{min}, {max}]")]
    InvalidBinWidth { min: f64, max: f64, width: f64 },

    /// Integral-mode range produces no bins or too many
    #[error("Invalid bin count for integer values: min={min}, max={max}")]
    InvalidBinCount { min: f64, max: f64 },

    /// A value fell outside every bin
    #[error("Invalid bin index {index} for value {value} ({bins} bins)")]
    InvalidBinIndex { index: i64, value: f64, bins: usize },

    /// NaN or infinity among the values to bin
    #[error("Cannot bin non-finite value {value}")]
    NonFiniteValue { value: f64 },

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

impl AnalyticsError {
    pub fn code(&self) -> &'static str {
        match self {
            AnalyticsError::UnknownParameter { .. } => "MNP_UNKNOWN_PARAMETER",
            AnalyticsError::InvalidBinWidth { .. } => "MNP_INVALID_BIN_WIDTH",
            AnalyticsError::InvalidBinCount { .. } => "MNP_INVALID_BIN_COUNT",
            AnalyticsError::InvalidBinIndex { .. } => "MNP_INVALID_BIN_INDEX",
            AnalyticsError::NonFiniteValue { .. } => "MNP_NON_FINITE_VALUE",
            AnalyticsError::Executor(e) => e.code(),
        }
    }

    /// Whether the caller's input caused the failure
    pub fn is_client_error(&self) -> bool {
        matches!(self, AnalyticsError::UnknownParameter { .. })
    }
}
