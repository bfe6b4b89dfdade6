// OpenAI-backed implementation of BaseAI

use anyhow::Result;
use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};

use super::traits::BaseAI;
use crate::common::{ChatTurn, Role};

/// Sampling temperature for conversational replies.
const CHAT_TEMPERATURE: f32 = 0.7;

/// Output token cap for conversational replies.
const CHAT_TOKEN_LIMIT: u32 = 1000;

/// Chat completions through the OpenAI REST client.
pub struct OpenAIBackend {
    client: OpenAIClient,
    chat_model: String,
    parse_model: String,
}

impl OpenAIBackend {
    pub fn new(client: OpenAIClient, chat_model: impl Into<String>, parse_model: impl Into<String>) -> Self {
        Self {
            client,
            chat_model: chat_model.into(),
            parse_model: parse_model.into(),
        }
    }

    fn chat_request(&self, system_prompt: &str, history: &[ChatTurn]) -> ChatRequest {
        ChatRequest::new(&self.chat_model)
            .message(Message::system(system_prompt))
            .messages(history.iter().map(to_message))
            .temperature(CHAT_TEMPERATURE)
            .token_limit(CHAT_TOKEN_LIMIT)
    }
}

fn to_message(turn: &ChatTurn) -> Message {
    match turn.role {
        Role::User => Message::user(&turn.content),
        Role::Assistant => Message::assistant(&turn.content),
    }
}

#[async_trait]
impl BaseAI for OpenAIBackend {
    async fn complete_chat(&self, system_prompt: &str, history: &[ChatTurn]) -> Result<String> {
        let response = self
            .client
            .chat_completion(self.chat_request(system_prompt, history))
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        Ok(response.content)
    }

    async fn complete_json(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.client
            .json_completion(&self.parse_model, system_prompt, user_prompt)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_puts_system_prompt_first() {
        let backend = OpenAIBackend::new(OpenAIClient::new("sk-test"), "gpt-4o-mini", "gpt-4o-mini");
        let history = vec![ChatTurn::assistant("Hello!"), ChatTurn::user("Hi")];

        let request = backend.chat_request("be brief", &history);

        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(
            request.messages,
            vec![
                Message::system("be brief"),
                Message::assistant("Hello!"),
                Message::user("Hi"),
            ]
        );
        assert_eq!(request.max_tokens, Some(CHAT_TOKEN_LIMIT));
    }
}
