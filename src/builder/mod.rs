//! Offline corpus construction.
//!
//! Transforms a tabular essay dataset into a [`Corpus`]: one embedding and
//! one metadata record per row, inserted strictly sequentially so row
//! indices in the index and the store agree by construction. Embedding is
//! the dominant cost; sequential insertion is the simple policy that keeps
//! the positional invariant trivially true.

mod error;


pub use error::BuildError;

use std::io::Read;
use std::path::Path;

use serde_json::{Map, Number, Value};
use tracing::{debug, info};

use crate::corpus::{normalize, Corpus, EssayRecord};
use crate::embedding::EmbeddingClient;

/// Default name of the essay text column in the source dataset.
pub const DEFAULT_ESSAY_COLUMN: &str = "essay";

/// CSV-to-corpus builder.
pub struct CorpusBuilder<E> {
    embedder: E,
    dim: usize,
    essay_column: String,
}

impl<E: EmbeddingClient> CorpusBuilder<E> {
    /// Creates a builder producing `dim`-dimensional embeddings.
    pub fn new(embedder: E, dim: usize) -> Self {
        Self {
            embedder,
            dim,
            essay_column: DEFAULT_ESSAY_COLUMN.to_string(),
        }
    }

    /// Overrides the essay text column name.
    pub fn essay_column(mut self, column: &str) -> Self {
        self.essay_column = column.to_string();
        self
    }

    /// Builds a corpus from a headered CSV file.
    pub async fn build_from_path(&self, path: &Path) -> Result<Corpus, BuildError> {
        let reader = csv::Reader::from_path(path)?;
        self.build(reader).await
    }

    /// Builds a corpus from any headered CSV source.
    pub async fn build<R: Read>(&self, mut reader: csv::Reader<R>) -> Result<Corpus, BuildError> {
        let headers = reader.headers()?.clone();
        let essay_idx = headers
            .iter()
            .position(|h| h == self.essay_column)
            .ok_or_else(|| BuildError::MissingColumn {
                column: self.essay_column.clone(),
            })?;

        let mut corpus = Corpus::new(self.dim);
        for (i, result) in reader.records().enumerate() {
            let row = i + 1;
            let record = result?;

            let essay = record.get(essay_idx).unwrap_or("").trim();
            if essay.is_empty() {
                return Err(BuildError::EmptyEssay {
                    row,
                    column: self.essay_column.clone(),
                });
            }

            let mut vector = self
                .embedder
                .embed(essay)
                .await
                .map_err(|source| BuildError::Embedding { row, source })?;
            normalize(&mut vector)?;

            let assigned = corpus.insert(&vector, row_to_record(&headers, &record))?;
            debug_assert_eq!(assigned, i);
            debug!(row, "indexed essay");
        }

        info!(rows = corpus.count(), dim = self.dim, "corpus build complete");
        Ok(corpus)
    }
}

/// Converts a CSV row into a metadata record, keeping every column.
///
/// Numeric-looking cells become JSON numbers so score columns round-trip
/// as numbers in prompts; everything else stays a string.
fn row_to_record(headers: &csv::StringRecord, record: &csv::StringRecord) -> EssayRecord {
    let mut map = Map::new();
    for (header, cell) in headers.iter().zip(record.iter()) {
        let value = match cell.parse::<f64>() {
            Ok(n) if !cell.is_empty() => Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(cell.to_string())),
            _ => Value::String(cell.to_string()),
        };
        map.insert(header.to_string(), value);
    }
    EssayRecord::from(map)
}
