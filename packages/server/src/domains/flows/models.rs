//! Flow execution payloads.
//!
//! Flow definitions are owned by the external store and handled as raw JSON,
//! so the proxy passes them through 1:1 whatever their shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /executeFlow`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteFlowRequest {
    pub flow_definition: Value,
    #[serde(default)]
    pub user_messages: Vec<Value>,
}

/// A successful flow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowExecution {
    pub all_messages: Vec<Value>,
    pub last_ai_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn execute_request_uses_camel_case() {
        let request = ExecuteFlowRequest {
            flow_definition: json!({"graph": {}}),
            user_messages: vec![json!({"role": "user", "content": "hi"})],
        };

        let body = serde_json::to_value(&request).unwrap();

        assert!(body.get("flowDefinition").is_some());
        assert_eq!(body["userMessages"][0]["content"], "hi");
    }
}
