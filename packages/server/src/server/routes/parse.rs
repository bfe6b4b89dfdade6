use axum::extract::rejection::JsonRejection;
use axum::extract::Extension;
use axum::Json;
use serde::Deserialize;

use crate::domains::parsing::ParsedMessage;
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseBody {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub message_id: Option<String>,
}

/// Classify an assistant message and derive its actions.
///
/// Model failures never surface here; they degrade to a standard message
/// with no actions.
pub async fn parse_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<ParseBody>, JsonRejection>,
) -> Result<Json<ParsedMessage>, ApiError> {
    let Json(body) = payload?;
    let message_id = body
        .message_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing 'messageId' field".to_string()))?;

    let parsed = state
        .deps
        .action_parser()
        .classify(&body.content, &message_id)
        .await;

    Ok(Json(parsed))
}
