//! Error handling module
//!
//! Defines error types and handling logic used in the project

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message returned when the request carries no usable topic
pub const TOPIC_REQUIRED_MESSAGE: &str = "Please provide a topic name.";

/// Message returned when the model reply has no text part
pub const NO_CONTENT_MESSAGE: &str = "No content returned from model.";

/// Message returned when the model reply cannot be read as JSON
pub const NOT_JSON_MESSAGE: &str = "Model response not in JSON format.";

/// Message returned when the request body exceeds the configured limit
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Payload too large";

/// Model text could not be parsed as JSON, even after brace extraction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Model response not in JSON format.")]
pub struct FormatError;

/// Application error types
///
/// The display text of each variant is exactly what the caller sees
/// in the `error` field of the response body.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request validation failed
    #[error("{0}")]
    Validation(String),

    /// Upstream call failed, reported an error, or returned no content
    #[error("{0}")]
    Upstream(String),

    /// Model output is not JSON
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Request body exceeds the configured limit
    #[error("Payload too large")]
    PayloadTooLarge,
}

/// Error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl AppError {
    /// Get HTTP status code
    ///
    /// Bad input is a 400 (413 for an oversized body); everything else is a 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Upstream(_) | AppError::Format(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error kind string (used in logs only)
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Upstream(_) => "upstream_error",
            AppError::Format(_) => "format_error",
            AppError::PayloadTooLarge => "payload_too_large",
        }
    }

    /// Convert to the response body
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

/// Transport failures surface as upstream errors; the URL is dropped since it carries the API key
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream(err.without_url().to_string())
    }
}

/// Implement IntoResponse trait to allow errors to be returned directly as HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(
                "❌ Error generating questions: {} ({}) - Status code: {}",
                self,
                self.error_type(),
                status
            );
        } else {
            tracing::warn!(
                "Client error: {} ({}) - Status code: {}",
                self,
                self.error_type(),
                status
            );
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Error handling helper functions
pub mod helpers {
    use super::*;

    /// Create validation error for a missing topic
    pub fn topic_required() -> AppError {
        AppError::Validation(TOPIC_REQUIRED_MESSAGE.to_string())
    }

    /// Create upstream error
    pub fn upstream_error(message: impl Into<String>) -> AppError {
        AppError::Upstream(message.into())
    }

    /// Create upstream error for a reply without text
    pub fn no_content() -> AppError {
        AppError::Upstream(NO_CONTENT_MESSAGE.to_string())
    }
}
