use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type shared by the pipeline and the HTTP shim.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction failure: {0}")]
    ExtractionFailure(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Rate limited by model provider")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Malformed model response: {0}")]
    ResponseMalformed(String),

    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the caller may retry the same request after a backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::ModelUnavailable(_) | AppError::RateLimited { .. }
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::UnsupportedFormat(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FORMAT",
                msg.clone(),
            ),
            AppError::ExtractionFailure(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_FAILURE",
                msg.clone(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::ModelUnavailable(msg) => {
                tracing::error!("Model unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "MODEL_UNAVAILABLE",
                    "The AI model is currently unavailable".to_string(),
                )
            }
            AppError::RateLimited { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                "The AI model is throttling requests, retry later".to_string(),
            ),
            AppError::ResponseMalformed(msg) => {
                tracing::error!("Malformed model response: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "RESPONSE_MALFORMED",
                    "The AI model returned an unusable response".to_string(),
                )
            }
            AppError::ConfigurationMissing(msg) => {
                tracing::error!("Configuration missing: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_MISSING",
                    "The service is not configured".to_string(),
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        let mut response = (status, body).into_response();

        if let AppError::RateLimited {
            retry_after: Some(delay),
        } = &self
        {
            if let Ok(value) = HeaderValue::from_str(&delay.as_secs().max(1).to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}
