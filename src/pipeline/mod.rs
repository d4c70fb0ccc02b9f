//! The request-time grading pipeline.
//!
//! [`EssayGrader`] is the explicitly constructed service context: the
//! loaded corpus, the embedding client, and the generation client, passed
//! wherever they are needed instead of living in process-wide state. One
//! instance serves concurrent requests; the corpus is read-only and the
//! clients are stateless, so no locking is involved.

mod error;


pub use error::PipelineError;

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::constants::{DEFAULT_TOP_K, GENERATION_TEMPERATURE};
use crate::corpus::{Corpus, EssayRecord};
use crate::embedding::EmbeddingClient;
use crate::generation::GenerationClient;
use crate::prompt;
use crate::retrieval::Retriever;
use crate::schema::{self, RepairPolicy, SchemaError};

/// Numeric trait/rater scores keyed like the score template.
pub type ScoreResult = Map<String, Value>;

/// Per-trait qualitative feedback keyed like the feedback template.
pub type FeedbackResult = Map<String, Value>;

/// Tunables for the grading pipeline.
#[derive(Debug, Clone, Copy)]
pub struct GraderOptions {
    /// Reference essays retrieved per request.
    pub top_k: usize,
    /// Re-prompt policy for malformed generation output.
    pub repair: RepairPolicy,
}

impl Default for GraderOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            repair: RepairPolicy::default(),
        }
    }
}

/// Retrieval-augmented essay grader.
pub struct EssayGrader<E, G> {
    retriever: Retriever<E>,
    generator: G,
    options: GraderOptions,
}

impl<E, G> EssayGrader<E, G>
where
    E: EmbeddingClient,
    G: GenerationClient,
{
    /// Creates a grader over a loaded corpus.
    pub fn new(corpus: Arc<Corpus>, embedder: E, generator: G, options: GraderOptions) -> Self {
        Self {
            retriever: Retriever::new(corpus, embedder),
            generator,
            options,
        }
    }

    /// Borrow of the underlying corpus.
    pub fn corpus(&self) -> &Corpus {
        self.retriever.corpus()
    }

    /// Scores `essay` against the fixed rubric.
    #[instrument(skip_all, fields(essay_len = essay.len()))]
    pub async fn score_essay(&self, essay: &str) -> Result<ScoreResult, PipelineError> {
        let references = self.retriever.retrieve(essay, self.options.top_k).await?;
        debug!(retrieved = references.len(), "assembled scoring context");

        let records: Vec<&EssayRecord> = references.iter().map(|r| &r.record).collect();
        let request = prompt::score_prompt(&records, essay);

        self.generate_validated(
            request,
            prompt::SCORE_BUDGET.max_tokens,
            prompt::score_template(),
        )
        .await
    }

    /// Produces per-trait feedback for `essay`, without scores.
    #[instrument(skip_all, fields(essay_len = essay.len()))]
    pub async fn generate_feedback(&self, essay: &str) -> Result<FeedbackResult, PipelineError> {
        // Retrieval first: an unsatisfiable request must not cost a
        // generation call.
        let references = self.retriever.retrieve(essay, self.options.top_k).await?;
        debug!(retrieved = references.len(), "assembled feedback context");

        let cleaned = self.clean_essay(essay).await?;

        let records: Vec<&EssayRecord> = references.iter().map(|r| &r.record).collect();
        let request = prompt::feedback_prompt(&records, &cleaned);

        self.generate_validated(
            request,
            prompt::FEEDBACK_BUDGET.max_tokens,
            prompt::feedback_template(),
        )
        .await
    }

    /// Strips stray symbols from `essay` via a generation call.
    ///
    /// Best-effort in intent but strict in failure: a failed or empty
    /// cleaning result aborts the feedback path so stray control
    /// characters can never corrupt downstream parsing.
    async fn clean_essay(&self, essay: &str) -> Result<String, PipelineError> {
        let request = prompt::clean_prompt(essay);
        let cleaned = self
            .generator
            .generate(
                &request,
                prompt::CLEAN_BUDGET.max_tokens,
                GENERATION_TEMPERATURE,
            )
            .await
            .map_err(|e| PipelineError::CleaningFailed {
                reason: e.to_string(),
            })?;

        let cleaned = cleaned.trim().to_string();
        if cleaned.is_empty() {
            return Err(PipelineError::CleaningFailed {
                reason: "cleaning returned empty content".to_string(),
            });
        }
        Ok(cleaned)
    }

    /// Runs one generation call and validates its output, re-prompting
    /// per the repair policy when validation fails.
    async fn generate_validated(
        &self,
        request: String,
        max_tokens: u32,
        template: Value,
    ) -> Result<Map<String, Value>, PipelineError> {
        let raw = self
            .generator
            .generate(&request, max_tokens, GENERATION_TEMPERATURE)
            .await?;

        let mut last_err: SchemaError = match schema::validate(&raw, &template) {
            Ok(object) => return Ok(object),
            Err(e) => e,
        };

        for attempt in 1..=self.options.repair.retries {
            warn!(
                attempt,
                retries = self.options.repair.retries,
                "generated output failed validation, re-prompting"
            );
            tokio::time::sleep(self.options.repair.delay(attempt)).await;

            let repair = prompt::repair_prompt(last_err.raw_output(), &template);
            let raw = self
                .generator
                .generate(&repair, max_tokens, GENERATION_TEMPERATURE)
                .await?;

            match schema::validate(&raw, &template) {
                Ok(object) => return Ok(object),
                Err(e) => last_err = e,
            }
        }

        Err(last_err.into())
    }
}
