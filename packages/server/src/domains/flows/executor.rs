//! HTTP client for the external flow execution server.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::error::{FlowError, FlowResult};
use super::extract::last_ai_message;
use super::models::{ExecuteFlowRequest, FlowExecution};
use crate::kernel::BaseFlowExecutor;

/// Execution server reached over HTTP, e.g. `http://localhost:5002`.
#[derive(Clone)]
pub struct HttpFlowExecutor {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpFlowExecutor {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> FlowResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FlowError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn execute_url(&self) -> String {
        format!("{}/executeFlow", self.base_url)
    }
}

#[async_trait]
impl BaseFlowExecutor for HttpFlowExecutor {
    async fn execute(&self, request: &ExecuteFlowRequest) -> FlowResult<FlowExecution> {
        let url = self.execute_url();
        tracing::debug!(
            url = %url,
            user_messages = request.user_messages.len(),
            "Forwarding flow execution"
        );

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Flow execution request failed");
                FlowError::from_transport(e)
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "Flow execution server responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Flow execution server returned non-OK");
            return Err(FlowError::ExecutionFailed(format!(
                "Non-OK status: {}",
                status.as_u16()
            )));
        }

        let data: Value = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse JSON from flow execution server");
            FlowError::ExecutionFailed("Failed to parse JSON from external server".to_string())
        })?;

        interpret_execution(data)
    }
}

/// Turn the server's `{success, messages, error?}` body into a run result.
pub fn interpret_execution(data: Value) -> FlowResult<FlowExecution> {
    if data.get("success").and_then(Value::as_bool) != Some(true) {
        let message = data
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("External server indicated success=false")
            .to_string();
        tracing::error!(error = %message, "Flow execution server indicated failure");
        return Err(FlowError::ExecutionFailed(message));
    }

    let all_messages = match data.get("messages") {
        Some(Value::Array(messages)) => messages.clone(),
        _ => Vec::new(),
    };
    let last_ai_message = last_ai_message(&all_messages);

    Ok(FlowExecution {
        all_messages,
        last_ai_message,
    })
}
