//! Interactive actions derived from assistant text.
//!
//! `Serialize` is the wire shape the UI renders. Untrusted JSON (model output)
//! must go through [`super::schema`] rather than `Deserialize`, which does not
//! reject extra keys.

use serde::{Deserialize, Serialize};

use crate::common::MessageId;

/// Visual weight of a button action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    Default,
    Primary,
    Destructive,
    Ghost,
}

impl ButtonVariant {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::Default),
            "primary" => Some(Self::Primary),
            "destructive" => Some(Self::Destructive),
            "ghost" => Some(Self::Ghost),
            _ => None,
        }
    }
}

/// A renderable interactive affordance attached to an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionType {
    /// A single clickable option; `action` is the text submitted on click.
    Button {
        label: String,
        action: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        variant: Option<ButtonVariant>,
    },
    /// Follow-up prompts rendered as chips.
    Suggestions { items: Vec<String> },
    /// A single yes/no confirmation dialog.
    #[serde(rename_all = "camelCase")]
    Confirm {
        title: String,
        description: String,
        confirm_label: String,
        cancel_label: String,
    },
}

impl ActionType {
    pub fn tag(&self) -> &'static str {
        match self {
            ActionType::Button { .. } => "button",
            ActionType::Suggestions { .. } => "suggestions",
            ActionType::Confirm { .. } => "confirm",
        }
    }
}

/// How an assistant message should be rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Standard,
    Transfer,
    Sentiment,
}

impl MessageType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "standard" => Some(Self::Standard),
            "transfer" => Some(Self::Transfer),
            "sentiment" => Some(Self::Sentiment),
            _ => None,
        }
    }
}

/// Classification of one assistant message plus its actions.
///
/// Transfer messages fill `from_token`/`to_token`/`amount`; sentiment messages
/// fill `topic`/`sentiment_level` (0 = very negative, 1 = very positive).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedMessageData {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_level: Option<f64>,
    #[serde(default)]
    pub actions: Vec<ActionType>,
}

impl ParsedMessageData {
    /// Neutral result: a standard message echoing `content`, no actions.
    pub fn standard(content: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::Standard,
            content: Some(content.into()),
            ..Default::default()
        }
    }
}

/// Actions keyed to the message they were derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageActions {
    pub message_id: MessageId,
    pub actions: Vec<ActionType>,
}

impl MessageActions {
    pub fn empty(message_id: impl Into<MessageId>) -> Self {
        Self {
            message_id: message_id.into(),
            actions: Vec::new(),
        }
    }
}

/// The `/parse` response: classification envelope keyed by message id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedMessage {
    pub message_id: MessageId,
    #[serde(flatten)]
    pub data: ParsedMessageData,
}

impl ParsedMessage {
    pub fn fallback(message_id: impl Into<MessageId>, content: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            data: ParsedMessageData::standard(content),
        }
    }

    pub fn message_actions(&self) -> MessageActions {
        MessageActions {
            message_id: self.message_id.clone(),
            actions: self.data.actions.clone(),
        }
    }
}
