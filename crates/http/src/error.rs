//! Error handling for the bookshelf HTTP layer
//!
//! Every failure is rendered as
//! `{"error": {"code": ..., "message": ..., "fields": [...]}}`, with `fields`
//! present only for validation failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Body of the error envelope
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation {
        fields: Vec<FieldError>,
        message: String,
    },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("request timed out")]
    Timeout,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(fields: Vec<FieldError>, message: impl Into<String>) -> Self {
        Self::Validation {
            fields,
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::BadRequest { .. } => "bad_request",
            AppError::NotFound { .. } => "not_found",
            AppError::Timeout => "request_timeout",
            AppError::Internal(_) => "internal_error",
        }
    }

    fn into_body(self) -> ErrorBody {
        let code = self.code();
        match self {
            AppError::Validation { fields, message } => ErrorBody {
                code,
                message,
                fields: Some(fields),
            },
            AppError::BadRequest { message } | AppError::NotFound { message } => ErrorBody {
                code,
                message,
                fields: None,
            },
            AppError::Timeout => ErrorBody {
                code,
                message: "The request took too long to complete".to_string(),
                fields: None,
            },
            // Store and infrastructure details stay in the logs.
            AppError::Internal(_) => ErrorBody {
                code,
                message: "An internal server error occurred".to_string(),
                fields: None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Internal(err) => {
                tracing::error!(
                    error = ?err,
                    error_code = self.code(),
                    status_code = %status.as_u16(),
                    "Request failed"
                );
            }
            other => {
                tracing::debug!(
                    error_code = other.code(),
                    status_code = %status.as_u16(),
                    "Request rejected: {}",
                    other
                );
            }
        }

        let envelope = ErrorEnvelope {
            error: self.into_body(),
        };

        (status, Json(envelope)).into_response()
    }
}
