use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors from the corpus (index + metadata) and its persistence.
pub enum CorpusError {
    /// A vector with (near-)zero Euclidean norm cannot be normalized.
    #[error("cannot normalize zero-norm vector (norm = {norm})")]
    ZeroNorm {
        /// The offending norm.
        norm: f32,
    },

    /// Vector length does not match the index dimension.
    #[error("invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension the index was created with.
        expected: usize,
        /// Dimension of the offered vector.
        actual: usize,
    },

    /// Row index past the end of the corpus.
    #[error("row {row} out of range (corpus holds {count} rows)")]
    RowOutOfRange {
        /// Requested row.
        row: usize,
        /// Rows currently stored.
        count: usize,
    },

    /// The paired snapshot artifacts disagree and must not be served.
    #[error(
        "corpus snapshot mismatch: index holds {index_rows} rows but metadata holds {metadata_rows}"
    )]
    SnapshotMismatch {
        /// Rows in the index blob.
        index_rows: usize,
        /// Records in the metadata blob.
        metadata_rows: usize,
    },

    /// The index blob failed structural validation.
    #[error("corrupt index blob at '{path}': {reason}")]
    CorruptIndex {
        /// Blob path.
        path: PathBuf,
        /// What failed.
        reason: String,
    },

    /// A metadata line failed to parse as a JSON object.
    #[error("corrupt metadata record at '{path}' line {line}: {source}")]
    CorruptMetadata {
        /// Blob path.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Parse failure.
        source: serde_json::Error,
    },

    /// Filesystem failure reading or writing a snapshot artifact.
    #[error("corpus I/O failure at '{path}': {source}")]
    Io {
        /// Artifact path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}
