// crates/server/src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sortcycle_core::{ClassifierError, ThumbnailError};
use sortcycle_db::DbError;
use thiserror::Error;

/// Structured JSON error response for API errors
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// API error types that map to HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller input malformed or missing — user-fixable.
    #[error("Bad request: {0}")]
    Validation(String),

    /// The text classifier was never configured. Permanent until operator
    /// action, so it gets its own status (503) rather than a generic 500.
    #[error("Text classification is not configured")]
    TextClassifierUnavailable,

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Thumbnail error: {0}")]
    Thumbnail(#[from] ThumbnailError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            ApiError::Validation(msg) => {
                tracing::warn!(message = %msg, "Bad request");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details("Bad request", msg.clone()),
                )
            }
            ApiError::TextClassifierUnavailable => {
                tracing::warn!("Text classification requested but not configured");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("Text classification is not configured"),
                )
            }
            ApiError::Classifier(err) => {
                let error_msg = match err {
                    ClassifierError::Upstream { status, .. } => {
                        tracing::error!(upstream_status = %status, "Upstream classifier error");
                        "Upstream classifier error"
                    }
                    ClassifierError::Transport(source) => {
                        tracing::error!(error = %source, "Classifier transport error");
                        "Failed to reach classifier"
                    }
                    ClassifierError::MalformedResponse(msg) => {
                        tracing::error!(message = %msg, "Malformed classifier response");
                        "Malformed classifier response"
                    }
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_details(error_msg, err.to_string()),
                )
            }
            ApiError::Thumbnail(err) => match err {
                ThumbnailError::Decode(source) => {
                    tracing::warn!(error = %source, "Undecodable image upload");
                    (
                        StatusCode::BAD_REQUEST,
                        ErrorResponse::with_details("Uploaded file is not a decodable image", err.to_string()),
                    )
                }
                ThumbnailError::Encode(source) => {
                    tracing::error!(error = %source, "Thumbnail encoding failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorResponse::new("Failed to encode thumbnail"),
                    )
                }
            },
            ApiError::Database(err) => match err {
                DbError::NotFound(id) => {
                    tracing::warn!(prediction_id = %id, "Prediction not found");
                    (
                        StatusCode::NOT_FOUND,
                        ErrorResponse::with_details("Prediction not found", format!("Prediction ID: {id}")),
                    )
                }
                DbError::NoThumbnail(id) => {
                    tracing::warn!(prediction_id = %id, "Prediction has no thumbnail");
                    (
                        StatusCode::CONFLICT,
                        ErrorResponse::with_details(
                            "Prediction has no thumbnail",
                            format!("Prediction {id} was created from a text description"),
                        ),
                    )
                }
                _ => {
                    tracing::error!(error = %err, "Database error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorResponse::with_details("Database error", err.to_string()),
                    )
                }
            },
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
