//! Document analysis routes: lexical keyword scoring and semantic ranking.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use doctopic_core::{AnalysisResult, Error, MatchPolicy};
use doctopic_ingest::extract_text;
use doctopic_resolve::KeywordMatcher;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::routes::upload::Upload;
use crate::state::{run_blocking, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/classify", post(classify))
}

/// POST /api/analyze: score an uploaded document against one topic's keywords.
///
/// Fields: `file`, `topic`, optional `policy` (`substring` or `token`).
async fn analyze(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let upload = Upload::read(multipart).await?;
    let (filename, file_type) = upload.document()?;
    let topic = upload.require("topic")?.to_string();
    let policy = match upload.field("policy") {
        Some(p) => p
            .parse::<MatchPolicy>()
            .map_err(|_| Error::InvalidInput(format!("unknown match policy '{}'", p)))?,
        None => state.config.match_policy,
    };

    let topics = state.keywords.snapshot();
    if !topics.contains_key(&topic) {
        return Err(Error::NotFound(format!("topic '{}'", topic)).into());
    }

    let bytes = upload.bytes;
    let scored_topic = topic.clone();
    let result = run_blocking(state.config.request_timeout, "keyword analysis", move || {
        let text = extract_text(&bytes, file_type)?;
        KeywordMatcher::new(policy).score_topic(&topics, &scored_topic, &text)
    })
    .await?;

    info!(
        "Analyzed {} against '{}': {} of {} words ({}%)",
        filename, topic, result.keyword_count, result.total_words, result.match_percent
    );

    Ok(Json(serde_json::json!({
        "title": "Analysis Results",
        "topic": topic,
        "filename": filename,
        "policy": policy,
        "result": AnalysisResult::from(result),
    })))
}

/// POST /api/classify: rank classifier labels for an uploaded document.
///
/// Fields: `file`, optional `k` (defaults to the configured top-k).
async fn classify(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let upload = Upload::read(multipart).await?;
    let (filename, file_type) = upload.document()?;
    let k = match upload.field("k") {
        Some(v) => v.parse::<usize>().map_err(|_| {
            Error::InvalidInput(format!("k must be a non-negative integer, got '{}'", v))
        })?,
        None => state.config.top_k,
    };

    let bytes = upload.bytes;
    let text = run_blocking(state.config.request_timeout, "text extraction", move || {
        extract_text(&bytes, file_type)
    })
    .await?;

    if text.trim().is_empty() {
        return Err(ApiError::NoText);
    }
    debug!("Classifying {} ({} chars, k={})", filename, text.len(), k);

    let classifier = state.classifier.clone();
    let classification = run_blocking(state.config.request_timeout, "classification", move || {
        classifier.analyze(&text, k)
    })
    .await?;

    info!("Classified {} as '{}'", filename, classification.topic);

    Ok(Json(serde_json::json!({
        "title": "Top Topics",
        "topic": classification.topic,
        "filename": filename,
        "result": AnalysisResult::from(classification.top),
    })))
}
