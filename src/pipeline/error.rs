use thiserror::Error;

use crate::generation::GenerationError;
use crate::retrieval::RetrievalError;
use crate::schema::SchemaError;

#[derive(Debug, Error)]
/// Request-scoped pipeline failures.
///
/// All variants are recoverable at the request boundary: the caller gets a
/// structured error and the service stays up.
pub enum PipelineError {
    /// Retrieval failed (empty corpus, bad k, embedding failure).
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    /// The generation call failed.
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Generated output never validated, even after any repair attempts.
    #[error("generated output failed validation: {0}")]
    Schema(#[from] SchemaError),

    /// The cleaning call failed or returned nothing usable; the feedback
    /// path must not proceed on the uncleaned essay.
    #[error("essay cleaning failed: {reason}")]
    CleaningFailed {
        /// What went wrong.
        reason: String,
    },
}
