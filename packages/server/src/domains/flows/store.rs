//! HTTP client for the external flow store (`/flows` CRUD).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde_json::Value;

use super::error::{FlowError, FlowResult};
use crate::kernel::BaseFlowStore;

/// Flow store reached over HTTP, e.g. `http://localhost:5001/api/v1`.
#[derive(Clone)]
pub struct HttpFlowStore {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpFlowStore {
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

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn flows_url(&self) -> String {
        format!("{}/flows", self.base_url)
    }

    fn flow_url(&self, id: &str) -> String {
        format!("{}/flows/{}", self.base_url, urlencoding::encode(id))
    }

    async fn send(&self, request: reqwest::RequestBuilder, what: &str) -> FlowResult<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Flow store request failed: {}", what);
            FlowError::from_transport(e)
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FlowError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Flow store rejected request: {}", what);
            return Err(FlowError::Upstream {
                status: status.as_u16(),
                message: format!(
                    "Failed to {}: {} {}",
                    what,
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("")
                )
                .trim_end()
                .to_string(),
            });
        }

        Ok(response)
    }

    async fn json(response: Response) -> FlowResult<Value> {
        response
            .json()
            .await
            .map_err(|e| FlowError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl BaseFlowStore for HttpFlowStore {
    async fn list_flows(&self) -> FlowResult<Value> {
        tracing::debug!(url = %self.flows_url(), "Listing flows");
        let response = self
            .send(self.http_client.get(self.flows_url()), "fetch flows")
            .await?;
        Self::json(response).await
    }

    async fn create_flow(&self, flow: Value) -> FlowResult<Value> {
        tracing::debug!(url = %self.flows_url(), "Creating flow");
        let response = self
            .send(
                self.http_client.post(self.flows_url()).json(&flow),
                "create flow",
            )
            .await?;
        Self::json(response).await
    }

    async fn get_flow(&self, id: &str) -> FlowResult<Value> {
        tracing::debug!(flow_id = %id, "Fetching flow");
        let response = self
            .send(self.http_client.get(self.flow_url(id)), "fetch flow")
            .await?;
        Self::json(response).await
    }

    async fn update_flow(&self, id: &str, flow: Value) -> FlowResult<Value> {
        tracing::debug!(flow_id = %id, "Updating flow");
        let response = self
            .send(
                self.http_client.put(self.flow_url(id)).json(&flow),
                "update flow",
            )
            .await?;
        Self::json(response).await
    }

    async fn delete_flow(&self, id: &str) -> FlowResult<()> {
        tracing::debug!(flow_id = %id, "Deleting flow");
        self.send(self.http_client.delete(self.flow_url(id)), "delete flow")
            .await?;
        Ok(())
    }
}
