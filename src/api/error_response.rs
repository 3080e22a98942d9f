//! HTTP error response handling for the API
//!
//! Converts [`Error`] into a response with the status from
//! [`Error::status_code`] and a JSON body:
//! `{"error": {"code": "...", "message": "..."}}`.

use crate::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "missing_url")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl From<&Error> for ApiError {
    fn from(error: &Error) -> Self {
        ApiError {
            error: ErrorDetail {
                code: error.error_code().to_string(),
                message: error.to_string(),
            },
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_client_error() {
            tracing::warn!(code = self.error_code(), error = %self, "Rejected request");
        } else {
            tracing::error!(code = self.error_code(), error = %self, "Request failed");
        }

        (status_code, Json(ApiError::from(&self))).into_response()
    }
}
