use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use faxdesk_ai::InferenceError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// The request payload could not be decoded by any accepted encoding.
#[derive(Debug, Error)]
pub enum DecodingError {
    #[error("empty body")]
    EmptyBody,
    #[error("no 'data' param found in request")]
    NoDataParam,
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read body: {0}")]
    Body(String),
}

/// Caller-visible failure, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: message.into(),
        }
    }
}

impl From<DecodingError> for ApiError {
    fn from(err: DecodingError) -> Self {
        Self::bad_request(format!("Invalid Data: {err}"))
    }
}

impl From<InferenceError> for ApiError {
    fn from(err: InferenceError) -> Self {
        Self::service_unavailable(err.to_string())
    }
}

impl IntoResponse for DecodingError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), error = %self.message, "inference failed");
        } else {
            warn!(status = self.status.as_u16(), error = %self.message, "bad request");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
