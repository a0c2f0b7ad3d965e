//! Topic keyword routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use doctopic_core::Error;
use tracing::info;

use crate::error::ApiError;
use crate::state::{run_blocking, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/topics", get(list_topics))
        .route("/topics/reload", post(reload_topics))
        .route("/topics/{name}", get(get_topic))
}

/// GET /api/topics: keyword topics, classifier labels and the default policy.
async fn list_topics(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "topics": state.keywords.topic_names(),
        "labels": state.classifier.labels(),
        "policy": state.config.match_policy,
    }))
}

/// GET /api/topics/{name}
async fn get_topic(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let keywords = state
        .keywords
        .keywords(&name)
        .ok_or_else(|| Error::NotFound(format!("topic '{}'", name)))?;
    Ok(Json(serde_json::json!({
        "topic": name,
        "keywords": keywords,
    })))
}

/// POST /api/topics/reload: re-read keyword data from disk.
///
/// A failed reload leaves the previous mapping in place.
async fn reload_topics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let limit = state.config.request_timeout;
    let worker = state.clone();
    let count = run_blocking(limit, "keyword reload", move || worker.keywords.reload()).await?;
    info!(
        "Keyword reload requested: {} topics from {}",
        count,
        state.keywords.source().display()
    );
    Ok(Json(serde_json::json!({ "topics": count })))
}
