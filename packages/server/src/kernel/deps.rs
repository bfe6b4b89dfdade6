//! Server dependencies (using traits for testability)
//!
//! Central dependency container shared by the HTTP handlers.
//! All external services use trait abstractions so tests can swap in mocks.

use std::sync::Arc;

use serde_json::Value;

use crate::domains::chat::{CompletionResponder, FlowResponder};
use crate::domains::parsing::ActionParser;
use crate::kernel::{BaseAI, BaseFlowExecutor, BaseFlowStore};

#[derive(Clone)]
pub struct ServerDeps {
    /// Completion service used by the Responder and the Action Parser.
    pub ai: Arc<dyn BaseAI>,
    pub flow_store: Arc<dyn BaseFlowStore>,
    pub flow_executor: Arc<dyn BaseFlowExecutor>,
}

impl ServerDeps {
    pub fn new(
        ai: Arc<dyn BaseAI>,
        flow_store: Arc<dyn BaseFlowStore>,
        flow_executor: Arc<dyn BaseFlowExecutor>,
    ) -> Self {
        Self {
            ai,
            flow_store,
            flow_executor,
        }
    }

    pub fn completion_responder(&self) -> CompletionResponder {
        CompletionResponder::new(self.ai.clone())
    }

    pub fn flow_responder(&self, flow_definition: Value) -> FlowResponder {
        FlowResponder::new(self.flow_executor.clone(), flow_definition)
    }

    pub fn action_parser(&self) -> ActionParser {
        ActionParser::new(self.ai.clone())
    }
}
