//! Transcript messages.

use serde::{Deserialize, Serialize};

use crate::common::{new_message_id, ChatTurn, MessageId, Role};
use crate::domains::parsing::ParsedMessageData;

/// One entry of a transcript. Immutable once rendered, except that the Action
/// Parser later attaches `parsed_data` to assistant messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_data: Option<ParsedMessageData>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: new_message_id(),
            content: content.into(),
            role,
            parsed_data: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<MessageId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn as_turn(&self) -> ChatTurn {
        ChatTurn {
            role: self.role,
            content: self.content.clone(),
        }
    }
}
