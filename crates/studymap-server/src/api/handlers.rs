//! API endpoint handlers
//!
//! Thin translation layer over the core: handlers never reach into SQL or
//! the inference service directly, and every read endpoint reflects
//! committed state only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use serde_json::Value;

use studymap_core::{analytics_summary, graph_payload, PipelineError};

use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub topic: String,
    pub summary: String,
}

/// Log a new entry through the enrichment pipeline
pub async fn create_entry(
    State(state): State<AppState>,
    Json(req): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let logged = state
        .pipeline
        .log_entry(&req.topic, &req.summary)
        .await
        .map_err(|e| match e {
            PipelineError::Validation(msg) => {
                tracing::debug!(error = %msg, "rejected entry");
                StatusCode::BAD_REQUEST
            }
            PipelineError::Storage(err) => {
                tracing::error!(error = %err, "entry creation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        })?;

    let body = serde_json::to_value(&logged).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// List all entries, newest first
pub async fn list_entries(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let entries = state
        .storage
        .list_entries()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(serde_json::json!({
        "total": entries.len(),
        "entries": entries,
    })))
}

/// Get one entry with its connections and blindspots
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    let entry = state
        .storage
        .get_entry(id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let connections = state
        .storage
        .connections_for_entry(id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let blindspots = state
        .storage
        .blindspots_for_entry(id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(serde_json::json!({
        "entry": entry,
        "connections": connections,
        "blindspots": blindspots,
    })))
}

/// List blindspots grouped by category
pub async fn list_blindspots(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let blindspots = state
        .storage
        .list_blindspots()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let mut categories = serde_json::Map::new();
    for spot in &blindspots {
        let list = categories
            .entry(spot.category.as_str().to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(items) = list {
            items.push(serde_json::json!({
                "id": spot.id,
                "entryId": spot.entry_id,
                "suggestion": spot.suggestion,
                "createdAt": spot.created_at.to_rfc3339(),
            }));
        }
    }

    Ok(Json(serde_json::json!({
        "total": blindspots.len(),
        "categories": categories,
    })))
}

/// Node/edge payload for the graph canvas
pub async fn get_graph(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let payload = graph_payload(&state.storage).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let body = serde_json::to_value(&payload).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(body))
}

/// The four chart datasets
pub async fn get_analytics(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let summary =
        analytics_summary(&state.storage).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let body = serde_json::to_value(&summary).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(body))
}

/// Row counts for the sidebar
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let stats = state
        .storage
        .stats()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let body = serde_json::to_value(stats).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(body))
}

/// Liveness probe
pub async fn health_check() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": studymap_core::VERSION,
    }))
}
