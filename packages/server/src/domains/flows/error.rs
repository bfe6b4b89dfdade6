//! Errors from the flow store and flow execution server.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Flow not found")]
    NotFound,

    /// Store answered with a non-2xx status other than 404.
    #[error("flow store error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("flow server unreachable: {0}")]
    Network(String),

    #[error("invalid response from flow server: {0}")]
    InvalidResponse(String),

    /// Execution server rejected or failed the run.
    #[error("{0}")]
    ExecutionFailed(String),
}

impl FlowError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FlowError::Network(format!("request timed out: {}", err))
        } else {
            FlowError::Network(err.to_string())
        }
    }
}

pub type FlowResult<T> = std::result::Result<T, FlowError>;
