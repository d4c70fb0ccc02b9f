use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::CorpusError;

/// One reference essay row, opaque beyond the essay text column.
///
/// Records come straight from the source dataset and keep every column
/// (rater scores, trait scores, identifiers) so prompts can present the
/// full reference object to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EssayRecord(pub Map<String, Value>);

impl EssayRecord {
    /// Returns the named column as text, if present and a string.
    pub fn text_column(&self, column: &str) -> Option<&str> {
        self.0.get(column).and_then(Value::as_str)
    }

    /// Borrow of the underlying column map.
    pub fn columns(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for EssayRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Insertion-ordered record storage addressed by index row.
///
/// Append returns the same monotonically increasing row sequence as
/// [`VectorIndex::insert`](super::VectorIndex::insert); the [`Corpus`](super::Corpus)
/// is responsible for keeping the two in lockstep.
#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    records: Vec<EssayRecord>,
}

impl MetadataStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Appends a record, returning its row index.
    pub fn append(&mut self, record: EssayRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    /// Returns the record at `row`.
    pub fn get(&self, row: usize) -> Result<&EssayRecord, CorpusError> {
        self.records.get(row).ok_or(CorpusError::RowOutOfRange {
            row,
            count: self.records.len(),
        })
    }

    /// Iterates records in row order (persistence only).
    pub(crate) fn iter(&self) -> impl Iterator<Item = &EssayRecord> {
        self.records.iter()
    }

    /// Rebuilds a store from records in row order (persistence only).
    pub(crate) fn from_records(records: Vec<EssayRecord>) -> Self {
        Self { records }
    }
}
