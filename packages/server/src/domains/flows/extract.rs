//! Last-AI-message extraction from an execution server's message list.
//!
//! Messages are scanned from the end. At each entry the shape matchers are
//! tried in order and the first hit wins, so a later legacy record beats an
//! earlier role-tagged one.

use serde_json::Value;

/// Content reported when no entry matches any shape.
pub const NO_AI_MESSAGE: &str = "[No AI message found]";

/// Recognizes one serialized shape of an AI-authored message.
pub trait MessageShape: Send + Sync {
    fn matches(&self, message: &Value) -> bool;

    /// Text of a matched message, if it carries any.
    fn content(&self, message: &Value) -> Option<String>;
}

/// `{ "role": "assistant", "content": ... }`
pub struct RoleTagged;

impl MessageShape for RoleTagged {
    fn matches(&self, message: &Value) -> bool {
        message.get("role").and_then(Value::as_str) == Some("assistant")
    }

    fn content(&self, message: &Value) -> Option<String> {
        message.get("content").and_then(content_text)
    }
}

/// Serialized LangChain constructor record:
/// `{ "lc": 1, "type": "constructor", "id": [..., "AIMessage"], "kwargs": { "content": ... } }`
pub struct LegacyConstructor;

impl MessageShape for LegacyConstructor {
    fn matches(&self, message: &Value) -> bool {
        message.get("lc").and_then(Value::as_f64) == Some(1.0)
            && message.get("type").and_then(Value::as_str) == Some("constructor")
            && message
                .get("id")
                .and_then(Value::as_array)
                .is_some_and(|id| id.iter().any(|part| part.as_str() == Some("AIMessage")))
    }

    fn content(&self, message: &Value) -> Option<String> {
        message
            .get("kwargs")
            .and_then(|kwargs| kwargs.get("content"))
            .and_then(content_text)
    }
}

/// Matchers in priority order.
pub const SHAPES: &[&dyn MessageShape] = &[&RoleTagged, &LegacyConstructor];

/// Text of the last AI-authored message, or [`NO_AI_MESSAGE`].
pub fn last_ai_message(messages: &[Value]) -> String {
    extract_with(messages, SHAPES)
}

pub fn extract_with(messages: &[Value], shapes: &[&dyn MessageShape]) -> String {
    messages
        .iter()
        .rev()
        .find_map(|message| {
            shapes
                .iter()
                .find(|shape| shape.matches(message))
                .map(|shape| shape.content(message))
        })
        .flatten()
        .unwrap_or_else(|| NO_AI_MESSAGE.to_string())
}

fn content_text(content: &Value) -> Option<String> {
    match content {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
