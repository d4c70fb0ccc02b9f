use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::pipeline::PipelineError;
use crate::retrieval::RetrievalError;

#[derive(Debug, Error)]
/// Request-boundary errors surfaced by the HTTP layer.
pub enum GatewayError {
    /// The request body was unusable.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The corpus holds no reference essays.
    #[error("service has no reference corpus loaded")]
    CorpusUnavailable,

    /// A remote embedding/generation dependency failed.
    #[error("upstream service failed: {0}")]
    Upstream(String),

    /// Generated output never conformed to the schema.
    #[error("model output failed validation: {0}")]
    Schema(String),

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(serde::Serialize)]
/// JSON error body.
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// HTTP status code, duplicated for convenience.
    pub code: u16,
}

impl From<PipelineError> for GatewayError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Retrieval(RetrievalError::EmptyCorpus) => GatewayError::CorpusUnavailable,
            PipelineError::Retrieval(RetrievalError::InvalidK { .. }) => {
                GatewayError::Internal(err.to_string())
            }
            PipelineError::Retrieval(RetrievalError::Embedding(_)) => {
                GatewayError::Upstream(err.to_string())
            }
            PipelineError::Retrieval(RetrievalError::Corpus(_)) => {
                GatewayError::Internal(err.to_string())
            }
            PipelineError::Generation(_) | PipelineError::CleaningFailed { .. } => {
                GatewayError::Upstream(err.to_string())
            }
            // The schema error's Display carries the raw model output for
            // operator inspection.
            PipelineError::Schema(_) => GatewayError::Schema(err.to_string()),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::CorpusUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Upstream(_) | GatewayError::Schema(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}
