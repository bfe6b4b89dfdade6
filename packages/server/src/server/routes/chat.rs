use axum::extract::rejection::JsonRejection;
use axum::extract::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::common::ChatTurn;
use crate::domains::chat::{ensure_not_blank, Message, Responder};
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    /// Inline flow definition; the reply comes from the flow execution server.
    #[serde(default)]
    pub flow: Option<Value>,
    /// Stored flow to run instead of an inline definition.
    #[serde(default)]
    pub flow_id: Option<String>,
}

/// Produce the assistant's reply to one user message.
pub async fn chat_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<ChatBody>, JsonRejection>,
) -> Result<Json<Message>, ApiError> {
    let Json(body) = payload?;
    let message = body.message.unwrap_or_default();
    ensure_not_blank(&message)?;

    let deps = &state.deps;
    let responder: Box<dyn Responder> = match (body.flow, body.flow_id) {
        (Some(flow), _) => Box::new(deps.flow_responder(flow)),
        (None, Some(flow_id)) => {
            let definition = deps.flow_store.get_flow(&flow_id).await?;
            debug!(flow_id = %flow_id, "Running stored flow");
            Box::new(deps.flow_responder(definition))
        }
        (None, None) => Box::new(deps.completion_responder()),
    };

    let reply = responder.respond(&message, &body.history).await?;
    info!(message_id = %reply.id, history_len = body.history.len(), "Chat reply sent");

    Ok(Json(reply))
}
