//! # API Errors
//!
//! Every failure leaves the API as the catalog envelope
//! `{"status": <http code>, "msg": <message>, "data": null}` with the
//! matching HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::analytics::AnalyticsError;
use crate::executor::ExecutorError;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Missing required parameter
    #[error("Missing required parameter: {0}")]
    MissingParam(String),

    /// Parameter present but unusable
    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("{0} not found")]
    NotFound(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error("{message}")]
    Internal { code: &'static str, message: String },
}

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError::NotFound(what.into())
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingParam(_) | ApiError::InvalidParam(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingParam(_) => "MNP_MISSING_PARAM",
            ApiError::InvalidParam(_) => "MNP_INVALID_PARAM",
            ApiError::NotFound(_) => "MNP_NOT_FOUND",
            ApiError::Internal { code, .. } => code,
        }
    }
}

impl From<ExecutorError> for ApiError {
    fn from(err: ExecutorError) -> Self {
        ApiError::Internal {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        if err.is_client_error() {
            ApiError::InvalidParam(err.to_string())
        } else {
            ApiError::Internal {
                code: err.code(),
                message: err.to_string(),
            }
        }
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::Internal {
            code: "MNP_EXPORT_FAILED",
            message: err.to_string(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub msg: String,
    pub data: Value,
}

impl From<&ApiError> for ErrorBody {
    fn from(err: &ApiError) -> Self {
        Self {
            status: err.status_code().as_u16(),
            msg: err.to_string(),
            data: Value::Null,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.code(), error = %self, "request failed");
        }
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MissingParam("parameter".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::not_found("Molecule").status_code(),
            StatusCode::NOT_FOUND
        );
        let err = ApiError::from(ExecutorError::from(sqlx::Error::PoolClosed));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "MNP_STORAGE_FAILED");
    }

    #[test]
    fn test_analytics_mapping() {
        let err = ApiError::from(AnalyticsError::UnknownParameter {
            parameter: "x".into(),
            chart: "density".into(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(AnalyticsError::InvalidBinWidth {
            min: 2.5,
            max: 2.5,
            width: 0.0,
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "MNP_INVALID_BIN_WIDTH");
    }

    #[test]
    fn test_error_body() {
        let err = ApiError::MissingParam("parameter".into());
        let body = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(body["status"], 400);
        assert_eq!(body["msg"], "Missing required parameter: parameter");
        assert!(body["data"].is_null());
    }
}
