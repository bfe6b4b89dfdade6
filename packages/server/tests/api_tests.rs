mod common;

use axum::http::StatusCode;
use chat_core::domains::flows::NO_AI_MESSAGE;
use chat_core::kernel::test_dependencies::{MockAI, MockFlowExecutor, MockFlowStore};
use chat_core::kernel::TestDependencies;
use chat_core::server::AppOptions;
use std::time::Duration;
use serde_json::{json, Value};

use common::{get, post, send, test_app, test_app_with};

fn stored_flow(id: &str) -> Value {
    json!({
        "id": id,
        "graph": {"nodes": [{"id": "start", "type": "input"}], "edges": []}
    })
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let deps = TestDependencies::new();
    let (status, body) = get(test_app(&deps), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test]
async fn chat_returns_assistant_message() {
    let deps = TestDependencies::new().mock_ai(MockAI::new().with_chat_response("Hi! How can I help?"));

    let (status, body) = post(
        test_app(&deps),
        "/chat",
        json!({
            "message": "What can you do?",
            "history": [
                {"role": "assistant", "content": "Hello"},
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "assistant");
    assert_eq!(body["content"], "Hi! How can I help?");
    assert_eq!(body["id"].as_str().unwrap().len(), 36);

    let calls = deps.ai.chat_calls();
    assert_eq!(calls.len(), 1);
    let history = &calls[0].history;
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].content, "What can you do?");
}

#[tokio::test]
async fn chat_rejects_blank_message_without_calling_upstream() {
    let deps = TestDependencies::new();

    let (status, body) = post(test_app(&deps), "/chat", json!({"message": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing 'message' field");

    let (status, _) = post(test_app(&deps), "/chat", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(deps.ai.chat_calls().is_empty());
}

#[tokio::test]
async fn chat_reports_upstream_failure_as_bad_gateway() {
    let deps = TestDependencies::new().mock_ai(MockAI::new().failing());

    let (status, body) = post(test_app(&deps), "/chat", json!({"message": "hello"})).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to send message"));
}

#[tokio::test]
async fn slow_request_times_out_with_json_error() {
    let deps = TestDependencies::new().mock_ai(MockAI::new().with_delay(Duration::from_millis(500)));
    let app = test_app_with(
        &deps,
        AppOptions {
            request_timeout: Duration::from_millis(50),
            ..AppOptions::default()
        },
    );

    let (status, body) = post(app, "/chat", json!({"message": "hi"})).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body, json!({"error": "Request timed out"}));
}

#[tokio::test]
async fn chat_with_inline_flow_uses_last_ai_message() {
    let deps = TestDependencies::new().mock_flow_executor(MockFlowExecutor::new().with_response(json!({
        "success": true,
        "messages": [
            {"role": "user", "content": "swap please"},
            {"role": "assistant", "content": "Sure, swapping now."}
        ]
    })));

    let (status, body) = post(
        test_app(&deps),
        "/chat",
        json!({
            "message": "swap please",
            "history": [{"role": "assistant", "content": "Hello"}],
            "flow": {"nodes": [], "edges": []}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "Sure, swapping now.");
    assert!(deps.ai.chat_calls().is_empty());

    let calls = deps.flow_executor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].user_messages,
        vec![
            json!({"role": "assistant", "content": "Hello"}),
            json!({"role": "user", "content": "swap please"}),
        ]
    );
}

#[tokio::test]
async fn chat_with_unknown_flow_id_is_not_found() {
    let deps = TestDependencies::new();

    let (status, body) = post(
        test_app(&deps),
        "/chat",
        json!({"message": "hi", "flowId": "missing"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Flow not found");
    assert!(deps.flow_executor.calls().is_empty());
}

#[tokio::test]
async fn chat_with_stored_flow_sends_its_definition() {
    let deps = TestDependencies::new()
        .mock_flow_store(MockFlowStore::new().with_flow(stored_flow("f1")))
        .mock_flow_executor(MockFlowExecutor::new().with_response(json!({
            "success": true,
            "messages": [{"role": "assistant", "content": "From the flow."}]
        })));

    let (status, body) = post(
        test_app(&deps),
        "/chat",
        json!({"message": "hi", "flowId": "f1"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "From the flow.");
    assert_eq!(deps.flow_executor.calls()[0].flow_definition["id"], "f1");
}

// =============================================================================
// Parse
// =============================================================================

#[tokio::test]
async fn parse_returns_classified_message() {
    let deps = TestDependencies::new().mock_ai(MockAI::new().with_json_response(
        r#"{
            "type": "transfer",
            "fromToken": "ETH",
            "toToken": "USDC",
            "amount": "1.5",
            "actions": [{
                "type": "confirm",
                "title": "Confirm swap",
                "description": "Swap 1.5 ETH for USDC",
                "confirmLabel": "Swap",
                "cancelLabel": "Cancel"
            }]
        }"#,
    ));

    let (status, body) = post(
        test_app(&deps),
        "/parse",
        json!({"content": "I can swap 1.5 ETH to USDC for you.", "messageId": "m-1"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messageId"], "m-1");
    assert_eq!(body["type"], "transfer");
    assert_eq!(body["fromToken"], "ETH");
    assert_eq!(body["actions"][0]["type"], "confirm");
    assert_eq!(body["actions"][0]["confirmLabel"], "Swap");
}

#[tokio::test]
async fn parse_falls_back_on_malformed_model_output() {
    let deps = TestDependencies::new()
        .mock_ai(MockAI::new().with_json_response(r#"{"actions": [{"type": "carousel"}]}"#));

    let (status, body) = post(
        test_app(&deps),
        "/parse",
        json!({"content": "Here you go.", "messageId": "m-2"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "messageId": "m-2",
            "type": "standard",
            "content": "Here you go.",
            "actions": []
        })
    );
}

#[tokio::test]
async fn parse_requires_message_id() {
    let deps = TestDependencies::new();

    let (status, body) = post(test_app(&deps), "/parse", json!({"content": "Hello"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing 'messageId' field");
    assert!(deps.ai.json_calls().is_empty());
}

// =============================================================================
// Flows proxy
// =============================================================================

#[tokio::test]
async fn flows_crud_round_trip() {
    let deps = TestDependencies::new();

    let (status, created) = post(
        test_app(&deps),
        "/flows",
        json!({"id": "f1", "name": "Onboarding", "graph": {"nodes": [], "edges": []}}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Onboarding");

    let (status, listed) = get(test_app(&deps), "/flows").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, updated) = send(
        test_app(&deps),
        "PUT",
        "/flows/f1",
        Some(json!({"name": "Renamed", "graph": {"nodes": [], "edges": []}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], "f1");
    assert_eq!(updated["name"], "Renamed");

    let (status, body) = send(test_app(&deps), "DELETE", "/flows/f1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    assert!(!deps.flow_store.contains("f1"));
}

#[tokio::test]
async fn flows_pass_through_bodies_of_any_shape() {
    let loose = json!({"id": 7, "name": "Draft", "graph": null});
    let deps = TestDependencies::new().mock_flow_store(MockFlowStore::new().with_flow(loose.clone()));

    let (status, body) = get(test_app(&deps), "/flows/7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, loose);

    let (status, listed) = get(test_app(&deps), "/flows").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([loose]));
}

#[tokio::test]
async fn unknown_flow_is_not_found() {
    let deps = TestDependencies::new();

    let (status, body) = get(test_app(&deps), "/flows/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Flow not found"}));

    let (status, _) = send(test_app(&deps), "DELETE", "/flows/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Execute flow
// =============================================================================

#[tokio::test]
async fn execute_flow_returns_messages_and_last_ai_message() {
    let deps = TestDependencies::new().mock_flow_executor(MockFlowExecutor::new().with_response(json!({
        "success": true,
        "messages": [
            {"role": "user", "content": "hi"},
            {"lc": 1, "type": "constructor", "id": ["langchain", "schema", "AIMessage"], "kwargs": {"content": "Hello from the flow"}}
        ]
    })));

    let (status, body) = post(
        test_app(&deps),
        "/execute-flow",
        json!({"flowDefinition": {"nodes": []}, "userMessages": ["hi"]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["allMessages"].as_array().unwrap().len(), 2);
    assert_eq!(body["lastAiMessage"], "Hello from the flow");
}

#[tokio::test]
async fn execute_flow_without_ai_message_uses_placeholder() {
    let deps = TestDependencies::new().mock_flow_executor(MockFlowExecutor::new().with_response(json!({
        "success": true,
        "messages": [{"role": "user", "content": "hi"}]
    })));

    let (status, body) = post(
        test_app(&deps),
        "/execute-flow",
        json!({"flowDefinition": {}, "userMessages": []}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lastAiMessage"], NO_AI_MESSAGE);
}

#[tokio::test]
async fn execute_flow_failure_carries_server_error() {
    let deps = TestDependencies::new().mock_flow_executor(
        MockFlowExecutor::new().with_response(json!({"success": false, "error": "node 3 crashed"})),
    );

    let (status, body) = post(
        test_app(&deps),
        "/execute-flow",
        json!({"flowDefinition": {}, "userMessages": []}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"success": false, "error": "node 3 crashed"}));
}

#[tokio::test]
async fn execute_flow_non_ok_status_is_reported() {
    let deps = TestDependencies::new();

    let (status, body) = post(
        test_app(&deps),
        "/execute-flow",
        json!({"flowDefinition": {}, "userMessages": []}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Non-OK status: 503");
}
