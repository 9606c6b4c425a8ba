//! HTTP API boundary for Kort.
//!
//! Exposes the summarization pipeline behind a small REST surface with
//! permissive CORS and per-IP rate limiting.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::KortError;
use crate::pipeline::{Pipeline, SkippedVideo};
use crate::rate_limit::RateLimiter;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared application state.
struct AppState {
    pipeline: Pipeline,
    limiter: RateLimiter,
}

/// Run the HTTP API server.
pub async fn run_server(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        pipeline: Pipeline::new(&settings),
        limiter: RateLimiter::with_config(&settings.rate_limit),
    });

    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Kort API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Summarize", "POST /summarize");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/summarize", post(summarize))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct SummarizeRequest {
    urls: Vec<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped: Option<Vec<SkippedVideo>>,
}

impl ErrorResponse {
    fn new(error: String) -> Self {
        Self {
            error,
            skipped: None,
        }
    }

    fn with_skipped(error: String, skipped: Vec<SkippedVideo>) -> Self {
        Self {
            error,
            skipped: (!skipped.is_empty()).then_some(skipped),
        }
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn summarize(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SummarizeRequest>,
) -> impl IntoResponse {
    // Admission check happens before any validation or fetch work.
    let identity = client_identity(&headers);
    let decision = state.limiter.check(&identity);
    if !decision.allowed {
        let error = KortError::RateLimited {
            retry_after_secs: decision.reset_in_secs(),
        };
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse::new(error.to_string())),
        )
            .into_response();
    }

    info!(
        "Summarize request from {} ({} urls, {} remaining in window)",
        identity,
        req.urls.len(),
        decision.remaining
    );

    match state.pipeline.run(&req.urls).await {
        Ok(output) => Json(output).into_response(),
        Err(failure) => (
            status_for(&failure.error),
            Json(ErrorResponse::with_skipped(
                failure.error.to_string(),
                failure.skipped,
            )),
        )
            .into_response(),
    }
}

/// Identity used for rate limiting: the first `x-forwarded-for` hop, or a
/// shared bucket for direct callers.
fn client_identity(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "anonymous".to_string())
}

/// HTTP status class for a terminal batch failure.
///
/// Input problems (including an all-failed fetch stage) are the caller's to
/// fix; generation-side failures are ours.
fn status_for(error: &KortError) -> StatusCode {
    match error {
        KortError::EmptyBatch
        | KortError::BatchTooLarge(_)
        | KortError::InvalidInput(_)
        | KortError::AllFailed => StatusCode::BAD_REQUEST,
        KortError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
