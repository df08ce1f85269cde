//! Axum routes for the summarize API.

use crate::config::ApiKeySource;
use crate::error::SummarizeError;
use crate::provider::ChatCompletionClient;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use marknote_core::summarize::SUMMARIZE_PATH;
use marknote_core::SummarizeResponse;
use serde_json::{json, Value};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

pub struct AppState {
    pub provider: ChatCompletionClient,
    pub api_key: Arc<dyn ApiKeySource>,
}

impl AppState {
    pub fn new(provider: ChatCompletionClient, api_key: impl ApiKeySource + 'static) -> Self {
        Self {
            provider,
            api_key: Arc::new(api_key),
        }
    }
}

/// Builds the application router.
///
/// Panics inside handlers are converted to the generic 500 response.
/// Request bodies are not size-capped, so long notes reach the handler.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(SUMMARIZE_PATH, post(summarize))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
}

// POST /api/summarize
async fn summarize(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    match summarize_content(&state, &body).await {
        Ok(summary) => (StatusCode::OK, Json(SummarizeResponse::summary(summary))).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn summarize_content(state: &AppState, body: &[u8]) -> Result<String, SummarizeError> {
    let content = parse_content(body)?;
    let api_key = state.api_key.api_key().ok_or(SummarizeError::NotConfigured)?;
    state.provider.summarize(&api_key, &content).await
}

/// Extracts a non-blank `content` string from a JSON request body.
///
/// Unparseable bodies and `null` are server errors; any other JSON value
/// without a usable `content` is a validation error.
fn parse_content(body: &[u8]) -> Result<String, SummarizeError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| SummarizeError::MalformedBody(err.to_string()))?;
    if value.is_null() {
        return Err(SummarizeError::MalformedBody("body is JSON null".to_string()));
    }
    match value.get("content").and_then(Value::as_str) {
        Some(content) if !content.trim().is_empty() => Ok(content.to_string()),
        _ => Err(SummarizeError::InvalidContent),
    }
}

// GET /health
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let details = payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    SummarizeError::Internal(details).into_response()
}
