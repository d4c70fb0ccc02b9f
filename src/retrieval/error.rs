use thiserror::Error;

use crate::corpus::CorpusError;
use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
/// Errors from the retrieval step.
pub enum RetrievalError {
    /// Nothing to search: retrieval over an empty corpus is unsatisfiable.
    #[error("cannot retrieve from an empty corpus")]
    EmptyCorpus,

    /// `k` must be positive.
    #[error("invalid retrieval count k = {k} (must be > 0)")]
    InvalidK {
        /// The requested k.
        k: usize,
    },

    /// The query embedding call failed.
    #[error("query embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Normalization or index access failed.
    #[error("corpus operation failed: {0}")]
    Corpus(#[from] CorpusError),
}
