use axum::{extract::State, Json};
use serde_json::Value;
use tracing::{info, instrument};

use crate::embedding::EmbeddingClient;
use crate::generation::GenerationClient;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::EssayRequest;
use crate::gateway::state::HandlerState;

#[instrument(skip(state, request), fields(essay_len = request.essay.len()))]
/// `POST /score-essay`: numeric trait/rater scores for the essay.
pub async fn score_essay_handler<E, G>(
    State(state): State<HandlerState<E, G>>,
    Json(request): Json<EssayRequest>,
) -> Result<Json<Value>, GatewayError>
where
    E: EmbeddingClient + Send + Sync + 'static,
    G: GenerationClient + Send + Sync + 'static,
{
    let essay = validated_essay(&request)?;
    let scores = state.grader.score_essay(essay).await?;
    info!("scored essay");
    Ok(Json(Value::Object(scores)))
}

#[instrument(skip(state, request), fields(essay_len = request.essay.len()))]
/// `POST /generate-feedback`: per-trait qualitative feedback.
pub async fn generate_feedback_handler<E, G>(
    State(state): State<HandlerState<E, G>>,
    Json(request): Json<EssayRequest>,
) -> Result<Json<Value>, GatewayError>
where
    E: EmbeddingClient + Send + Sync + 'static,
    G: GenerationClient + Send + Sync + 'static,
{
    let essay = validated_essay(&request)?;
    let feedback = state.grader.generate_feedback(essay).await?;
    info!("generated feedback");
    Ok(Json(Value::Object(feedback)))
}

fn validated_essay(request: &EssayRequest) -> Result<&str, GatewayError> {
    let essay = request.essay.trim();
    if essay.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "essay must not be empty".to_string(),
        ));
    }
    Ok(essay)
}
