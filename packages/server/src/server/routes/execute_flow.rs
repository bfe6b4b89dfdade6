use axum::extract::rejection::JsonRejection;
use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::domains::flows::{ExecuteFlowRequest, FlowExecution};
use crate::server::app::AppState;

#[derive(Debug, Serialize)]
pub struct ExecuteFlowResponse {
    pub success: bool,
    #[serde(flatten)]
    pub execution: FlowExecution,
}

/// Failure body for `/execute-flow`: `{"success": false, "error": "..."}`.
#[derive(Debug)]
pub struct ExecuteFlowError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ExecuteFlowError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "success": false, "error": self.message }));
        (self.status, body).into_response()
    }
}

/// Run a flow on the execution server and return its messages.
pub async fn execute_flow_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<ExecuteFlowRequest>, JsonRejection>,
) -> Result<Json<ExecuteFlowResponse>, ExecuteFlowError> {
    let Json(request) = payload.map_err(|rejection| ExecuteFlowError {
        status: StatusCode::BAD_REQUEST,
        message: rejection.body_text(),
    })?;

    let execution = state
        .deps
        .flow_executor
        .execute(&request)
        .await
        .map_err(|e| {
            warn!(error = %e, "Flow execution failed");
            ExecuteFlowError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: e.to_string(),
            }
        })?;

    info!(messages = execution.all_messages.len(), "Flow executed");
    Ok(Json(ExecuteFlowResponse {
        success: true,
        execution,
    }))
}
