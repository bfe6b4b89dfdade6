// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{BaseAI, BaseFlowExecutor, BaseFlowStore, ServerDeps};
use crate::common::ChatTurn;
use crate::domains::flows::{ExecuteFlowRequest, FlowError, FlowExecution, FlowResult};

// =============================================================================
// Mock AI (Generic LLM capabilities)
// =============================================================================

/// Arguments captured from a `complete_chat` call
#[derive(Debug, Clone)]
pub struct ChatCallArgs {
    pub system_prompt: String,
    pub history: Vec<ChatTurn>,
}

/// Queued responses are consumed in order; an empty queue yields a canned reply.
pub struct MockAI {
    chat_responses: Arc<Mutex<Vec<String>>>,
    json_responses: Arc<Mutex<Vec<String>>>,
    chat_calls: Arc<Mutex<Vec<ChatCallArgs>>>,
    json_calls: Arc<Mutex<Vec<(String, String)>>>,
    fail: bool,
    delay: Option<Duration>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            chat_responses: Arc::new(Mutex::new(Vec::new())),
            json_responses: Arc::new(Mutex::new(Vec::new())),
            chat_calls: Arc::new(Mutex::new(Vec::new())),
            json_calls: Arc::new(Mutex::new(Vec::new())),
            fail: false,
            delay: None,
        }
    }

    /// Add a chat reply to the queue
    pub fn with_chat_response(self, reply: &str) -> Self {
        self.chat_responses.lock().unwrap().push(reply.to_string());
        self
    }

    /// Add a raw JSON-mode reply to the queue
    pub fn with_json_response(self, raw: &str) -> Self {
        self.json_responses.lock().unwrap().push(raw.to_string());
        self
    }

    /// Every call fails like an unreachable upstream
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Every chat call stalls for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn chat_calls(&self) -> Vec<ChatCallArgs> {
        self.chat_calls.lock().unwrap().clone()
    }

    /// `(system_prompt, user_prompt)` pairs
    pub fn json_calls(&self) -> Vec<(String, String)> {
        self.json_calls.lock().unwrap().clone()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete_chat(&self, system_prompt: &str, history: &[ChatTurn]) -> Result<String> {
        self.chat_calls.lock().unwrap().push(ChatCallArgs {
            system_prompt: system_prompt.to_string(),
            history: history.to_vec(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail {
            anyhow::bail!("mock completion service unavailable");
        }

        let mut responses = self.chat_responses.lock().unwrap();
        if !responses.is_empty() {
            Ok(responses.remove(0))
        } else {
            Ok("Mock reply.".to_string())
        }
    }

    async fn complete_json(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.json_calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        if self.fail {
            anyhow::bail!("mock completion service unavailable");
        }

        let mut responses = self.json_responses.lock().unwrap();
        if !responses.is_empty() {
            Ok(responses.remove(0))
        } else {
            Ok(r#"{"type": "standard", "actions": []}"#.to_string())
        }
    }
}

// =============================================================================
// Mock Flow Store
// =============================================================================

/// In-memory flow store keyed by flow id. Bodies are stored and returned as-is.
#[derive(Default)]
pub struct MockFlowStore {
    flows: Arc<Mutex<HashMap<String, Value>>>,
}

impl MockFlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panics if `flow` has no `id`.
    pub fn with_flow(self, flow: Value) -> Self {
        let id = flow_id(&flow).expect("stored flow needs an id");
        self.flows.lock().unwrap().insert(id, flow);
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.flows.lock().unwrap().contains_key(id)
    }
}

/// String or numeric `id` of a flow body.
fn flow_id(flow: &Value) -> Option<String> {
    match flow.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[async_trait]
impl BaseFlowStore for MockFlowStore {
    async fn list_flows(&self) -> FlowResult<Value> {
        let flows = self.flows.lock().unwrap();
        let mut ids: Vec<&String> = flows.keys().collect();
        ids.sort();
        Ok(Value::Array(ids.into_iter().map(|id| flows[id].clone()).collect()))
    }

    async fn create_flow(&self, flow: Value) -> FlowResult<Value> {
        let id = flow_id(&flow).ok_or_else(|| FlowError::Upstream {
            status: 400,
            message: "Failed to create flow: 400 Bad Request".to_string(),
        })?;
        self.flows.lock().unwrap().insert(id, flow.clone());
        Ok(flow)
    }

    async fn get_flow(&self, id: &str) -> FlowResult<Value> {
        self.flows
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or(FlowError::NotFound)
    }

    async fn update_flow(&self, id: &str, flow: Value) -> FlowResult<Value> {
        let mut flows = self.flows.lock().unwrap();
        if !flows.contains_key(id) {
            return Err(FlowError::NotFound);
        }
        let mut flow = flow;
        if let Value::Object(fields) = &mut flow {
            fields.insert("id".to_string(), Value::String(id.to_string()));
        }
        flows.insert(id.to_string(), flow.clone());
        Ok(flow)
    }

    async fn delete_flow(&self, id: &str) -> FlowResult<()> {
        self.flows
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or(FlowError::NotFound)
    }
}

// =============================================================================
// Mock Flow Executor
// =============================================================================

/// Replays queued execution server bodies through the real interpretation logic.
#[derive(Default)]
pub struct MockFlowExecutor {
    responses: Arc<Mutex<Vec<Value>>>,
    calls: Arc<Mutex<Vec<ExecuteFlowRequest>>>,
}

impl MockFlowExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw `{success, messages, error?}` body
    pub fn with_response(self, body: Value) -> Self {
        self.responses.lock().unwrap().push(body);
        self
    }

    pub fn calls(&self) -> Vec<ExecuteFlowRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseFlowExecutor for MockFlowExecutor {
    async fn execute(&self, request: &ExecuteFlowRequest) -> FlowResult<FlowExecution> {
        self.calls.lock().unwrap().push(request.clone());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(FlowError::ExecutionFailed(
                "Non-OK status: 503".to_string(),
            ));
        }
        crate::domains::flows::executor::interpret_execution(responses.remove(0))
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mocks plus handles to inspect them after the code under test has run.
pub struct TestDependencies {
    pub ai: Arc<MockAI>,
    pub flow_store: Arc<MockFlowStore>,
    pub flow_executor: Arc<MockFlowExecutor>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            ai: Arc::new(MockAI::new()),
            flow_store: Arc::new(MockFlowStore::new()),
            flow_executor: Arc::new(MockFlowExecutor::new()),
        }
    }

    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    pub fn mock_flow_store(mut self, store: MockFlowStore) -> Self {
        self.flow_store = Arc::new(store);
        self
    }

    pub fn mock_flow_executor(mut self, executor: MockFlowExecutor) -> Self {
        self.flow_executor = Arc::new(executor);
        self
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.ai.clone(),
            self.flow_store.clone(),
            self.flow_executor.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
