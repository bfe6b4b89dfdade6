//! Action Parser: assistant text in, validated actions out.
//!
//! Both entry points are total. Backend failures, unparseable JSON and schema
//! violations all collapse to the neutral result and are only logged.

use std::sync::Arc;

use openai_client::strip_code_blocks;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::models::{ActionType, MessageActions, ParsedMessage};
use super::policy::policy_violations;
use super::prompts::{ACTIONS_PROMPT, CLASSIFY_PROMPT};
use super::schema::{validate_message_actions, validate_parsed_data, ActionSchemaError};
use crate::kernel::BaseAI;

/// Why a classification attempt fell back to the neutral result.
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("classification backend failed: {0}")]
    Backend(#[source] anyhow::Error),

    #[error("classification output is not JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("classification output violates the action schema: {0}")]
    Schema(#[from] ActionSchemaError),
}

#[derive(Clone)]
pub struct ActionParser {
    ai: Arc<dyn BaseAI>,
}

impl ActionParser {
    pub fn new(ai: Arc<dyn BaseAI>) -> Self {
        Self { ai }
    }

    /// Derive `{messageId, actions}` for one assistant message.
    pub async fn parse_actions(&self, content: &str, message_id: &str) -> MessageActions {
        if content.trim().is_empty() {
            return MessageActions::empty(message_id);
        }

        match self.try_parse_actions(content, message_id).await {
            Ok(actions) => {
                self.report_policy(message_id, &actions.actions);
                actions
            }
            Err(failure) => {
                warn!(message_id = %message_id, error = %failure, "Action parsing fell back to no actions");
                MessageActions::empty(message_id)
            }
        }
    }

    /// Classify one assistant message (standard / transfer / sentiment) and derive its actions.
    pub async fn classify(&self, content: &str, message_id: &str) -> ParsedMessage {
        if content.trim().is_empty() {
            return ParsedMessage::fallback(message_id, content);
        }

        match self.try_classify(content, message_id).await {
            Ok(parsed) => {
                self.report_policy(message_id, &parsed.data.actions);
                parsed
            }
            Err(failure) => {
                warn!(message_id = %message_id, error = %failure, "Classification fell back to standard message");
                ParsedMessage::fallback(message_id, content)
            }
        }
    }

    async fn try_parse_actions(
        &self,
        content: &str,
        message_id: &str,
    ) -> Result<MessageActions, ParseFailure> {
        let value = self.request(ACTIONS_PROMPT, content).await?;
        Ok(validate_message_actions(value, message_id)?)
    }

    async fn try_classify(&self, content: &str, message_id: &str) -> Result<ParsedMessage, ParseFailure> {
        let value = self.request(CLASSIFY_PROMPT, content).await?;
        Ok(ParsedMessage {
            message_id: message_id.to_string(),
            data: validate_parsed_data(value)?,
        })
    }

    async fn request(&self, system_prompt: &str, content: &str) -> Result<Value, ParseFailure> {
        let raw = self
            .ai
            .complete_json(system_prompt, content)
            .await
            .map_err(ParseFailure::Backend)?;

        debug!(response_len = raw.len(), "Classification response received");

        Ok(serde_json::from_str(strip_code_blocks(&raw))?)
    }

    fn report_policy(&self, message_id: &str, actions: &[ActionType]) {
        for violation in policy_violations(actions) {
            warn!(message_id = %message_id, violation = %violation, "Action policy not followed");
        }
    }
}
