//! Image intake endpoints.
//!
//! Bodies are taken as raw bytes regardless of content type and handed to the
//! extractor or analyzer unchanged.

use axum::{body::Bytes, extract::State, Json};
use poseidon_understanding::{ImageAnalysis, TextExtractor};
use serde_json::Value;
use tracing::info;

use crate::server::AppState;

/// Handler for `POST /ocr`
pub async fn ocr(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    info!(route = "/ocr", bytes = body.len(), "Received image");
    Json(Value::Object(state.ocr.extract_text(&body)))
}

/// Handler for `POST /analyze`
pub async fn analyze(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    info!(route = "/analyze", bytes = body.len(), "Received image");
    Json(Value::Object(state.analyzer.analyze(&body).await))
}
