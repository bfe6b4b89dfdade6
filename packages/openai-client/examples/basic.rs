//! Basic OpenAI client usage example

use std::time::Duration;

use openai_client::{ChatRequest, Message, OpenAIClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = OpenAIClient::from_env()?.with_timeout(Duration::from_secs(30))?;

    println!("=== Chat Completion ===");
    let response = client
        .chat_completion(
            ChatRequest::new("gpt-4o-mini")
                .message(Message::system("You are a helpful assistant."))
                .message(Message::user("What is Rust in one sentence?"))
                .temperature(0.7)
                .token_limit(100),
        )
        .await?;

    println!("Response: {}", response.content);

    println!("\n=== JSON Completion ===");
    let json = client
        .json_completion(
            "gpt-4o-mini",
            "Reply with a JSON object of the form {\"language\": string, \"year\": number}.",
            "When did Rust 1.0 ship?",
        )
        .await?;

    println!("JSON: {}", json);

    Ok(())
}
