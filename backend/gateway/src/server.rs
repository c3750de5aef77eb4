//! Main HTTP Gateway Server.

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use poseidon_understanding::{ImageAnalysis, TextExtractor};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::{extract_api, health_api};

/// Application state shared across routes.
#[derive(Clone)]
pub struct AppState {
    pub ocr: Arc<dyn TextExtractor>,
    pub analyzer: Arc<dyn ImageAnalysis>,
    started_at: Instant,
}

impl AppState {
    pub fn new(ocr: Arc<dyn TextExtractor>, analyzer: Arc<dyn ImageAnalysis>) -> Self {
        Self {
            ocr,
            analyzer,
            started_at: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Build the router. `max_upload` caps request bodies; larger ones get 413.
pub fn build_router(state: AppState, max_upload: usize) -> Router {
    Router::new()
        .route("/", get(health_api::banner))
        .route("/health", get(health_api::get_health))
        .route("/ocr", post(extract_api::ocr))
        .route("/analyze", post(extract_api::analyze))
        .layer(DefaultBodyLimit::max(max_upload))
        .with_state(state)
}

/// Serve until Ctrl-C or SIGTERM.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: AppState, max_upload: usize) -> Result<()> {
    let app = build_router(state, max_upload);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Gateway HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use poseidon_core::{FallbackSource, StaticFallback};
    use poseidon_understanding::{DeepSeekAnalyzer, OcrService};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn fixed() -> StaticFallback {
        StaticFallback::from_value(json!({"status": "fallback", "text": "canned"}))
    }

    fn router(limit: usize) -> Router {
        let source: Arc<dyn FallbackSource> = Arc::new(fixed());
        let state = AppState::new(
            Arc::new(OcrService::new(source.clone())),
            Arc::new(DeepSeekAnalyzer::new(source)),
        );
        build_router(state, limit)
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_as(uri: &str, content_type: Option<&str>, body: impl Into<Body>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        builder.body(body.into()).unwrap()
    }

    fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
        post_as(uri, Some("application/octet-stream"), body)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(router(1024), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "poseidon");
        assert!(body["uptime_seconds"].is_u64());
    }

    #[tokio::test]
    async fn banner_names_service() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, body) = send(router(1024), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "poseidon");
    }

    #[tokio::test]
    async fn ocr_returns_fallback_document() {
        let (status, body) = send(router(1024), post("/ocr", vec![0x89, b'P', b'N', b'G'])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Object(fixed().generate()));
    }

    #[tokio::test]
    async fn analyze_returns_fallback_document() {
        let (status, body) = send(router(1024), post("/analyze", "definitely not an image")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Object(fixed().generate()));
    }

    #[tokio::test]
    async fn empty_body_is_accepted() {
        let (status, body) = send(router(1024), post("/analyze", Body::empty())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "canned");
    }

    #[tokio::test]
    async fn png_content_type_is_accepted() {
        let png = vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
        for uri in ["/ocr", "/analyze"] {
            let (status, body) = send(router(1024), post_as(uri, Some("image/png"), png.clone())).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body, Value::Object(fixed().generate()), "{uri}");
        }
    }

    #[tokio::test]
    async fn missing_content_type_is_accepted() {
        for uri in ["/ocr", "/analyze"] {
            let (status, body) = send(router(1024), post_as(uri, None, vec![1u8, 2, 3])).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body, Value::Object(fixed().generate()), "{uri}");
        }
    }

    #[tokio::test]
    async fn mismatched_content_type_is_accepted() {
        let req = post_as("/ocr", Some("application/json"), "{not json");
        let (status, body) = send(router(1024), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "canned");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let (status, _) = send(router(16), post("/ocr", vec![0u8; 64])).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn get_on_ocr_not_allowed() {
        let req = Request::builder().uri("/ocr").body(Body::empty()).unwrap();
        let (status, _) = send(router(1024), req).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
