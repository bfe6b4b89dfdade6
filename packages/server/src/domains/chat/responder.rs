//! Responder: one user message plus history in, one assistant message out.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use super::models::Message;
use super::prompts::RESPONDER_PROMPT;
use crate::common::ChatTurn;
use crate::domains::flows::ExecuteFlowRequest;
use crate::kernel::{BaseAI, BaseFlowExecutor};

#[derive(Debug, Error)]
pub enum ResponderError {
    /// Blank input; no upstream call was made.
    #[error("Missing 'message' field")]
    EmptyInput,

    /// Timeout, non-2xx or malformed body upstream. No message was produced.
    #[error("Failed to send message: {0}")]
    Upstream(String),
}

#[async_trait]
pub trait Responder: Send + Sync {
    /// Produce exactly one new assistant message for `message`, given the
    /// prior `history` (which does not include `message`).
    async fn respond(&self, message: &str, history: &[ChatTurn]) -> Result<Message, ResponderError>;
}

/// Reject blank input before any network call.
pub fn ensure_not_blank(message: &str) -> Result<(), ResponderError> {
    if message.trim().is_empty() {
        Err(ResponderError::EmptyInput)
    } else {
        Ok(())
    }
}

fn with_message(history: &[ChatTurn], message: &str) -> Vec<ChatTurn> {
    let mut turns = history.to_vec();
    turns.push(ChatTurn::user(message));
    turns
}

// =============================================================================
// Completion service
// =============================================================================

pub struct CompletionResponder {
    ai: Arc<dyn BaseAI>,
}

impl CompletionResponder {
    pub fn new(ai: Arc<dyn BaseAI>) -> Self {
        Self { ai }
    }
}

#[async_trait]
impl Responder for CompletionResponder {
    async fn respond(&self, message: &str, history: &[ChatTurn]) -> Result<Message, ResponderError> {
        ensure_not_blank(message)?;

        let turns = with_message(history, message);
        let reply = self
            .ai
            .complete_chat(RESPONDER_PROMPT, &turns)
            .await
            .map_err(|e| {
                warn!(error = %e, "Completion service failed");
                ResponderError::Upstream(e.to_string())
            })?;

        if reply.trim().is_empty() {
            return Err(ResponderError::Upstream("empty reply".to_string()));
        }

        debug!(history_len = history.len(), reply_len = reply.len(), "Assistant reply generated");
        Ok(Message::assistant(reply))
    }
}

// =============================================================================
// Flow execution server
// =============================================================================

/// Runs the turn through a flow; the reply is the flow's last AI message.
pub struct FlowResponder {
    executor: Arc<dyn BaseFlowExecutor>,
    flow_definition: Value,
}

impl FlowResponder {
    pub fn new(executor: Arc<dyn BaseFlowExecutor>, flow_definition: Value) -> Self {
        Self {
            executor,
            flow_definition,
        }
    }
}

#[async_trait]
impl Responder for FlowResponder {
    async fn respond(&self, message: &str, history: &[ChatTurn]) -> Result<Message, ResponderError> {
        ensure_not_blank(message)?;

        let request = ExecuteFlowRequest {
            flow_definition: self.flow_definition.clone(),
            user_messages: with_message(history, message)
                .into_iter()
                .map(|turn| json!({"role": turn.role, "content": turn.content}))
                .collect(),
        };

        let execution = self.executor.execute(&request).await.map_err(|e| {
            warn!(error = %e, "Flow execution failed");
            ResponderError::Upstream(e.to_string())
        })?;

        debug!(
            messages = execution.all_messages.len(),
            "Flow reply extracted"
        );
        Ok(Message::assistant(execution.last_ai_message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Role;
    use crate::kernel::test_dependencies::{MockAI, MockFlowExecutor};

    #[tokio::test]
    async fn completion_reply_becomes_assistant_message() {
        let ai = Arc::new(MockAI::new().with_chat_response("Rust is fast."));
        let responder = CompletionResponder::new(ai.clone());

        let message = responder
            .respond("What is Rust?", &[ChatTurn::assistant("Hello!")])
            .await
            .unwrap();

        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.content, "Rust is fast.");
        assert!(!message.id.is_empty());

        let calls = ai.chat_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system_prompt, RESPONDER_PROMPT);
        assert_eq!(
            calls[0].history,
            vec![ChatTurn::assistant("Hello!"), ChatTurn::user("What is Rust?")]
        );
    }

    #[tokio::test]
    async fn blank_input_never_reaches_upstream() {
        let ai = Arc::new(MockAI::new());
        let responder = CompletionResponder::new(ai.clone());

        let err = responder.respond(" \n\t", &[]).await.unwrap_err();

        assert!(matches!(err, ResponderError::EmptyInput));
        assert!(ai.chat_calls().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_is_generic() {
        let responder = CompletionResponder::new(Arc::new(MockAI::new().failing()));

        let err = responder.respond("hi", &[]).await.unwrap_err();

        assert!(matches!(err, ResponderError::Upstream(_)));
    }

    #[tokio::test]
    async fn empty_completion_is_a_failure() {
        let responder = CompletionResponder::new(Arc::new(MockAI::new().with_chat_response("  ")));

        assert!(responder.respond("hi", &[]).await.is_err());
    }

    #[tokio::test]
    async fn flow_reply_is_last_ai_message() {
        let executor = Arc::new(MockFlowExecutor::new().with_response(json!({
            "success": true,
            "messages": [
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "From the flow"}
            ]
        })));
        let responder = FlowResponder::new(executor.clone(), json!({"graph": {"nodes": [], "edges": []}}));

        let message = responder.respond("hi", &[]).await.unwrap();

        assert_eq!(message.content, "From the flow");
        let calls = executor.calls();
        assert_eq!(calls[0].user_messages, vec![json!({"role": "user", "content": "hi"})]);
        assert_eq!(calls[0].flow_definition["graph"]["nodes"], json!([]));
    }

    #[tokio::test]
    async fn flow_failure_is_generic() {
        let executor = Arc::new(
            MockFlowExecutor::new().with_response(json!({"success": false, "error": "boom"})),
        );
        let responder = FlowResponder::new(executor, json!({}));

        let err = responder.respond("hi", &[]).await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to send message: boom");
    }
}
