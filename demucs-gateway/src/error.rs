//! Error types for demucs-gateway
//!
//! Every failure on `/run` is recovered into a `{"error": "<message>"}` body.
//! Nothing here is allowed to take the process down.
//!
//! Once the body has been read as JSON, the handler owns the outcome and
//! answers 200: callers branch on the `error` key, and a 5xx would invite
//! platform retries of a separation that may already have uploaded stems.
//! Only a body that is not a JSON object is refused at the HTTP level.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::job::{JobError, ValidationError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// API key mismatch
    #[error("unauthorized")]
    Unauthorized,

    /// Body is not a JSON object (400)
    #[error("{0}")]
    InvalidBody(String),

    /// Required field absent or unusable
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Separation tool exited non-zero
    #[error("demucs-separate failed (exit {exit_code})")]
    ToolFailed { exit_code: i32 },

    /// Setup or execution failure
    #[error(transparent)]
    Job(#[from] JobError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::OK,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
