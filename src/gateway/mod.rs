//! HTTP gateway (Axum) for the grading pipeline.
//!
//! Two grading endpoints plus health/readiness probes. CORS is restricted
//! to the configured frontend origin.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::{ErrorResponse, GatewayError};
pub use handler::{generate_feedback_handler, score_essay_handler};
pub use payload::EssayRequest;
pub use state::HandlerState;

use crate::embedding::EmbeddingClient;
use crate::generation::GenerationClient;

/// Builds the service router over shared handler state.
///
/// `allowed_origin` is the single frontend origin CORS will admit; an
/// unparseable origin falls back to same-origin only (no CORS header).
pub fn create_router_with_state<E, G>(
    state: HandlerState<E, G>,
    allowed_origin: &str,
) -> Router
where
    E: EmbeddingClient + Send + Sync + 'static,
    G: GenerationClient + Send + Sync + 'static,
{
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    if let Ok(origin) = allowed_origin.parse::<HeaderValue>() {
        cors = cors.allow_origin(origin);
    }

    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/score-essay", post(score_essay_handler))
        .route("/generate-feedback", post(generate_feedback_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
/// Body of `GET /healthz`.
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: &'static str,
}

#[derive(serde::Serialize)]
/// Body of `GET /ready`.
pub struct ReadyResponse {
    /// `"ready"` once the corpus is loaded.
    pub status: &'static str,
    /// Reference essays available for retrieval.
    pub corpus_rows: usize,
}

/// Liveness probe.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn ready_handler<E, G>(
    axum::extract::State(state): axum::extract::State<HandlerState<E, G>>,
) -> Json<ReadyResponse>
where
    E: EmbeddingClient + Send + Sync + 'static,
    G: GenerationClient + Send + Sync + 'static,
{
    Json(ReadyResponse {
        status: "ready",
        corpus_rows: state.grader.corpus().count(),
    })
}
