use thiserror::Error;

use crate::corpus::CorpusError;
use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
/// Errors from the offline corpus build.
pub enum BuildError {
    /// The dataset could not be read or parsed.
    #[error("failed to read essay dataset: {0}")]
    Dataset(#[from] csv::Error),

    /// The configured essay column is absent from the dataset header.
    #[error("essay column '{column}' not found in dataset header")]
    MissingColumn {
        /// The column that was expected.
        column: String,
    },

    /// A row's essay cell was empty.
    #[error("row {row} has an empty '{column}' cell")]
    EmptyEssay {
        /// 1-based data row number.
        row: usize,
        /// The essay column name.
        column: String,
    },

    /// Embedding a row failed.
    #[error("failed to embed row {row}: {source}")]
    Embedding {
        /// 1-based data row number.
        row: usize,
        /// Underlying embedding error.
        source: EmbeddingError,
    },

    /// Normalization or insertion failed.
    #[error("corpus insertion failed: {0}")]
    Corpus(#[from] CorpusError),
}
