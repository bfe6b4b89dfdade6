//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    BoxError, Router,
};
use tower::timeout::{error::Elapsed, TimeoutLayer};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::kernel::ServerDeps;
use crate::server::error::ApiError;
use crate::server::routes::{
    chat_handler, create_flow_handler, delete_flow_handler, execute_flow_handler, get_flow_handler,
    health_handler, list_flows_handler, parse_handler, update_flow_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

/// Outer HTTP surface settings.
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Empty allows any origin.
    pub allowed_origins: Vec<String>,
    pub request_timeout: Duration,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
}

/// Turn a middleware failure into a JSON error response.
async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(format!("Unhandled internal error: {}", err))
    }
}

/// Build the router over the given dependencies.
pub fn build_app(deps: ServerDeps, options: AppOptions) -> Router {
    let state = AppState {
        deps: Arc::new(deps),
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .route("/parse", post(parse_handler))
        .route("/flows", get(list_flows_handler).post(create_flow_handler))
        .route(
            "/flows/:id",
            get(get_flow_handler)
                .put(update_flow_handler)
                .delete(delete_flow_handler),
        )
        .route("/execute-flow", post(execute_flow_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(state))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(options.request_timeout)),
        )
        .layer(cors_layer(&options.allowed_origins))
        .layer(TraceLayer::new_for_http())
}
