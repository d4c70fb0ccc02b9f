//! Query-time retrieval of reference essays.
//!
//! Embeds the candidate essay, normalizes it, searches the corpus, and
//! resolves row indices back to metadata records. Unsatisfiable requests
//! (empty corpus, k = 0) fail before the embedding call so no remote
//! budget is spent on them.

mod error;

#[cfg(test)]
mod tests;

pub use error::RetrievalError;

use std::sync::Arc;

use crate::corpus::{normalize, Corpus, EssayRecord};
use crate::embedding::EmbeddingClient;

/// One retrieved reference essay with its distance to the query.
#[derive(Debug, Clone)]
pub struct RetrievedEssay {
    /// The reference record.
    pub record: EssayRecord,
    /// Squared-L2 distance to the query embedding (ascending = closer).
    pub distance: f32,
}

/// Ordered retrieval output, most similar first.
pub type RetrievalResult = Vec<RetrievedEssay>;

/// Nearest-reference retriever over a shared read-only corpus.
#[derive(Clone)]
pub struct Retriever<E> {
    corpus: Arc<Corpus>,
    embedder: E,
}

impl<E: EmbeddingClient> Retriever<E> {
    /// Creates a retriever over `corpus` using `embedder` for queries.
    pub fn new(corpus: Arc<Corpus>, embedder: E) -> Self {
        Self { corpus, embedder }
    }

    /// Borrow of the underlying corpus.
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Retrieves the `min(k, corpus size)` nearest reference essays.
    pub async fn retrieve(&self, essay: &str, k: usize) -> Result<RetrievalResult, RetrievalError> {
        if k == 0 {
            return Err(RetrievalError::InvalidK { k });
        }
        if self.corpus.is_empty() {
            return Err(RetrievalError::EmptyCorpus);
        }

        let mut query = self.embedder.embed(essay).await?;
        normalize(&mut query)?;

        let neighbors = self.corpus.search(&query, k)?;
        let mut results = Vec::with_capacity(neighbors.len());
        for n in neighbors {
            let record = self.corpus.record(n.row)?.clone();
            results.push(RetrievedEssay {
                record,
                distance: n.distance,
            });
        }
        Ok(results)
    }
}
