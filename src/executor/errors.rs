//! Executor error types
//!
//! Error codes:
//! - MNP_STORAGE_FAILED
//! - MNP_RECORD_DECODE

use thiserror::Error;

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Executor errors. Every variant is a service-level failure.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Connection, pool or query failure reported by the storage backend
    #[error("Storage failure: {0}")]
    Storage(#[from] sqlx::Error),

    /// A row came back in a shape the catalog schema does not describe
    #[error("Cannot decode column {column}: {reason}")]
    Decode { column: String, reason: String },
}

impl ExecutorError {
    pub fn decode(column: impl Into<String>, reason: impl ToString) -> Self {
        ExecutorError::Decode {
            column: column.into(),
            reason: reason.to_string(),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorError::Storage(_) => "MNP_STORAGE_FAILED",
            ExecutorError::Decode { .. } => "MNP_RECORD_DECODE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = ExecutorError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.code(), "MNP_STORAGE_FAILED");
        assert!(err.to_string().starts_with("Storage failure"));

        let err = ExecutorError::decode("alogp", "not a number");
        assert_eq!(err.code(), "MNP_RECORD_DECODE");
        assert_eq!(err.to_string(), "Cannot decode column alogp: not a number");
    }
}
