//! Pass-through proxy to the external flow store.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use crate::server::app::AppState;
use crate::server::error::ApiError;

pub async fn list_flows_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.deps.flow_store.list_flows().await?))
}

pub async fn create_flow_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(flow) = payload?;
    let created = state.deps.flow_store.create_flow(flow).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_flow_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.deps.flow_store.get_flow(&id).await?))
}

pub async fn update_flow_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(flow) = payload?;
    Ok(Json(state.deps.flow_store.update_flow(&id, flow).await?))
}

pub async fn delete_flow_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.deps.flow_store.delete_flow(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
