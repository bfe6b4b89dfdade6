// Main entry point for the chat API server

use std::sync::Arc;

use anyhow::{Context, Result};
use chat_core::domains::flows::{HttpFlowExecutor, HttpFlowStore};
use chat_core::kernel::{OpenAIBackend, ServerDeps};
use chat_core::server::{build_app, AppOptions};
use chat_core::Config;
use openai_client::OpenAIClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,chat_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting chat API server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        chat_model = %config.chat_model,
        parse_model = %config.parse_model,
        flow_store = %config.flow_store_url,
        flow_executor = %config.flow_executor_url,
        timeout_secs = config.request_timeout.as_secs(),
        "Configuration loaded"
    );

    // External services
    let openai = OpenAIClient::new(&config.openai_api_key)
        .with_base_url(&config.openai_base_url)
        .with_timeout(config.request_timeout)
        .context("Failed to build OpenAI client")?;
    let flow_store = HttpFlowStore::new(&config.flow_store_url, config.request_timeout)
        .context("Failed to build flow store client")?;
    let flow_executor = HttpFlowExecutor::new(&config.flow_executor_url, config.request_timeout)
        .context("Failed to build flow executor client")?;

    let deps = ServerDeps::new(
        Arc::new(OpenAIBackend::new(openai, &config.chat_model, &config.parse_model)),
        Arc::new(flow_store),
        Arc::new(flow_executor),
    );

    // Build application
    let app = build_app(
        deps,
        AppOptions {
            allowed_origins: config.allowed_origins.clone(),
            request_timeout: config.request_timeout,
        },
    );

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
