// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Prompting, validation and fallback policy live in the domains that use them.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseFlowStore)

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::common::ChatTurn;
use crate::domains::flows::{ExecuteFlowRequest, FlowExecution, FlowResult};

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Continue a conversation; returns the assistant's free-text reply.
    async fn complete_chat(&self, system_prompt: &str, history: &[ChatTurn]) -> Result<String>;

    /// Ask for a single JSON object; returns the raw JSON string.
    /// Parse and validate in calling code.
    async fn complete_json(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

// =============================================================================
// Flow Store Trait (Infrastructure - external flow CRUD)
// =============================================================================

#[async_trait]
pub trait BaseFlowStore: Send + Sync {
    // Bodies are returned exactly as the store sends them.

    async fn list_flows(&self) -> FlowResult<Value>;

    async fn create_flow(&self, flow: Value) -> FlowResult<Value>;

    /// `FlowError::NotFound` when the store has no such flow.
    async fn get_flow(&self, id: &str) -> FlowResult<Value>;

    async fn update_flow(&self, id: &str, flow: Value) -> FlowResult<Value>;

    async fn delete_flow(&self, id: &str) -> FlowResult<()>;
}

// =============================================================================
// Flow Executor Trait (Infrastructure - external flow runs)
// =============================================================================

#[async_trait]
pub trait BaseFlowExecutor: Send + Sync {
    /// Run a flow over the user's messages and extract the last AI reply.
    async fn execute(&self, request: &ExecuteFlowRequest) -> FlowResult<FlowExecution>;
}
