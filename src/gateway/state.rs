use std::sync::Arc;

use crate::embedding::EmbeddingClient;
use crate::generation::GenerationClient;
use crate::pipeline::EssayGrader;

/// Shared handler state: the grader built once at startup.
pub struct HandlerState<E, G> {
    /// The grading pipeline.
    pub grader: Arc<EssayGrader<E, G>>,
}

// Manual Clone: `E`/`G` themselves need not be Clone behind the Arc.
impl<E, G> Clone for HandlerState<E, G> {
    fn clone(&self) -> Self {
        Self {
            grader: Arc::clone(&self.grader),
        }
    }
}

impl<E, G> HandlerState<E, G>
where
    E: EmbeddingClient + Send + Sync + 'static,
    G: GenerationClient + Send + Sync + 'static,
{
    /// Wraps a grader for use as axum state.
    pub fn new(grader: Arc<EssayGrader<E, G>>) -> Self {
        Self { grader }
    }
}
