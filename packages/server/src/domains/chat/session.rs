//! Transcript and turn driver for one conversation.
//!
//! A turn is strictly sequential: append the user message, await the
//! Responder, append the reply, await the Action Parser, attach the result.
//! `ChatSession::submit` takes `&mut self`, so one transcript never has two
//! turns in flight.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use super::models::Message;
use super::prompts::GREETING;
use super::responder::{ensure_not_blank, Responder, ResponderError};
use crate::common::{ChatTurn, MessageId, Role};
use crate::domains::parsing::{ActionParser, MessageActions, ParsedMessageData};

/// Id of the greeting that seeds every transcript.
pub const GREETING_ID: &str = "1";

/// Key of the session-wide error slot, as opposed to per-message errors.
pub const GENERAL_ERROR: &str = "general";

/// Ordered messages of one conversation plus the actions derived from them.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    actions: HashMap<MessageId, MessageActions>,
    errors: HashMap<String, String>,
}

impl Transcript {
    /// An empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript opened by the assistant greeting, which carries no actions.
    pub fn with_greeting() -> Self {
        let mut transcript = Self::new();
        transcript.push(Message::assistant(GREETING).with_id(GREETING_ID));
        transcript
            .actions
            .insert(GREETING_ID.to_string(), MessageActions::empty(GREETING_ID));
        transcript
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// `{role, content}` pairs of every message, in order.
    pub fn history(&self) -> Vec<ChatTurn> {
        self.messages.iter().map(Message::as_turn).collect()
    }

    /// Attach parse results to an existing message. Actions are recorded in
    /// the action map only when there are any.
    ///
    /// Returns `false` when no message has `id`; nothing is recorded then.
    pub fn attach_parsed(&mut self, id: &str, data: ParsedMessageData) -> bool {
        let Some(message) = self.messages.iter_mut().find(|m| m.id == id) else {
            return false;
        };

        if !data.actions.is_empty() {
            self.actions.insert(
                id.to_string(),
                MessageActions {
                    message_id: id.to_string(),
                    actions: data.actions.clone(),
                },
            );
        }
        message.parsed_data = Some(data);
        true
    }

    pub fn actions_for(&self, id: &str) -> Option<&MessageActions> {
        self.actions.get(id)
    }

    /// An assistant reply still waiting for its parse result.
    pub fn is_parsing(&self, id: &str) -> bool {
        self.message(id).is_some_and(|m| {
            m.role == Role::Assistant && m.parsed_data.is_none() && m.id != GREETING_ID
        })
    }

    pub fn error_for(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    fn record_error(&mut self, key: impl Into<String>, error: impl Into<String>) {
        self.errors.insert(key.into(), error.into());
    }

    fn clear_errors(&mut self) {
        self.errors.clear();
    }
}

/// What a user clicked on an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionClick {
    /// `suggest:<text>` from a suggestion chip.
    Suggest(String),
    /// `confirm:<title>` from a confirm dialog.
    Confirm(String),
    /// `cancel:<title>` from a confirm dialog.
    Cancel(String),
    /// A button's own `action` value.
    Button(String),
}

impl ActionClick {
    pub fn parse(value: &str) -> Self {
        if let Some(text) = value.strip_prefix("suggest:") {
            ActionClick::Suggest(text.to_string())
        } else if let Some(title) = value.strip_prefix("confirm:") {
            ActionClick::Confirm(title.to_string())
        } else if let Some(title) = value.strip_prefix("cancel:") {
            ActionClick::Cancel(title.to_string())
        } else {
            ActionClick::Button(value.to_string())
        }
    }

    /// Text submitted as the next user turn. Suggestions submit their text;
    /// everything else submits the raw click value.
    pub fn submission(&self) -> String {
        match self {
            ActionClick::Suggest(text) => text.clone(),
            ActionClick::Confirm(title) => format!("confirm:{}", title),
            ActionClick::Cancel(title) => format!("cancel:{}", title),
            ActionClick::Button(action) => action.clone(),
        }
    }
}

/// Result of one completed turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub user_message: Message,
    pub reply: Message,
    pub actions: MessageActions,
}

/// A transcript bound to the services that extend it.
pub struct ChatSession {
    transcript: Transcript,
    responder: Arc<dyn Responder>,
    parser: ActionParser,
}

impl ChatSession {
    pub fn new(responder: Arc<dyn Responder>, parser: ActionParser) -> Self {
        Self::with_transcript(Transcript::with_greeting(), responder, parser)
    }

    pub fn with_transcript(
        transcript: Transcript,
        responder: Arc<dyn Responder>,
        parser: ActionParser,
    ) -> Self {
        Self {
            transcript,
            responder,
            parser,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Run one turn. Blank input is rejected before anything is appended or sent.
    ///
    /// On Responder failure the user message stays in the transcript, the
    /// general error slot is set, and no assistant message is added.
    pub async fn submit(&mut self, input: &str) -> Result<TurnOutcome, ResponderError> {
        ensure_not_blank(input)?;

        let history = self.transcript.history();
        let user_message = Message::user(input);
        self.transcript.push(user_message.clone());
        self.transcript.clear_errors();

        let reply = match self.responder.respond(input, &history).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Turn failed");
                self.transcript
                    .record_error(GENERAL_ERROR, "Failed to send message");
                return Err(e);
            }
        };
        self.transcript.push(reply.clone());

        let parsed = self.parser.classify(&reply.content, &reply.id).await;
        let actions = parsed.message_actions();
        self.transcript.attach_parsed(&reply.id, parsed.data);

        info!(
            message_id = %reply.id,
            actions = actions.actions.len(),
            "Turn complete"
        );

        let reply = self
            .transcript
            .message(&reply.id)
            .cloned()
            .unwrap_or(reply);

        Ok(TurnOutcome {
            user_message,
            reply,
            actions,
        })
    }

    /// Submit the text behind a clicked action as the next turn.
    pub async fn click(&mut self, value: &str) -> Result<TurnOutcome, ResponderError> {
        let submission = ActionClick::parse(value).submission();
        self.submit(&submission).await
    }
}
