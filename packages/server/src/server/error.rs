//! HTTP error responses.
//!
//! Every failure renders as `{"error": "..."}` with a status matching its cause.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

use crate::domains::chat::ResponderError;
use crate::domains::flows::FlowError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// A dependency failed; `status` is what the client sees.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    /// The whole request outlived the configured timeout.
    #[error("Request timed out")]
    Timeout,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { status, .. } => *status,
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.status();
        if code.is_server_error() {
            warn!(status = %code, error = %self, "Request failed");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (code, body).into_response()
    }
}

impl From<FlowError> for ApiError {
    fn from(e: FlowError) -> Self {
        match e {
            FlowError::NotFound => ApiError::NotFound(e.to_string()),
            // Client errors from the store are the caller's fault; pass them through.
            FlowError::Upstream { status, message } => {
                let status = StatusCode::from_u16(status)
                    .ok()
                    .filter(StatusCode::is_client_error)
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                ApiError::Upstream { status, message }
            }
            other => ApiError::Upstream {
                status: StatusCode::BAD_GATEWAY,
                message: other.to_string(),
            },
        }
    }
}

impl From<ResponderError> for ApiError {
    fn from(e: ResponderError) -> Self {
        match e {
            ResponderError::EmptyInput => ApiError::BadRequest(e.to_string()),
            ResponderError::Upstream(_) => ApiError::Upstream {
                status: StatusCode::BAD_GATEWAY,
                message: e.to_string(),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
