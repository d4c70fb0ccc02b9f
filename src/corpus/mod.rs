//! The reference corpus: a vector index and a metadata store kept in
//! lockstep.
//!
//! Row `i` of the index always addresses record `i` of the store. That
//! positional correspondence is the central invariant of the pipeline, so
//! both structures live behind [`Corpus::insert`] and cannot drift apart
//! through caller discipline alone.

pub mod error;
pub mod index;
pub mod persist;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::CorpusError;
pub use index::{Neighbor, VectorIndex};
pub use store::{EssayRecord, MetadataStore};

use crate::constants::NORM_EPSILON;

/// Rescales `vector` to unit Euclidean norm in place.
///
/// Fails on (near-)zero input instead of dividing by zero; callers never
/// see NaN components.
pub fn normalize(vector: &mut [f32]) -> Result<(), CorpusError> {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm < NORM_EPSILON {
        return Err(CorpusError::ZeroNorm { norm });
    }
    for v in vector.iter_mut() {
        *v /= norm;
    }
    Ok(())
}

/// Immutable-after-build reference corpus.
///
/// Built once offline, persisted as a linked pair of artifacts, and loaded
/// read-only at service start. Serving paths only read, so an `Arc<Corpus>`
/// is freely shared across concurrent requests without locking.
#[derive(Debug, Clone)]
pub struct Corpus {
    index: VectorIndex,
    metadata: MetadataStore,
}

impl Corpus {
    /// Creates an empty corpus for embeddings of dimension `dim`.
    pub fn new(dim: usize) -> Self {
        Self {
            index: VectorIndex::new(dim),
            metadata: MetadataStore::new(),
        }
    }

    /// Returns the embedding dimension.
    pub fn dim(&self) -> usize {
        self.index.dim()
    }

    /// Returns the number of (vector, record) rows.
    pub fn count(&self) -> usize {
        debug_assert_eq!(self.index.count(), self.metadata.count());
        self.index.count()
    }

    /// Returns `true` if the corpus holds no rows.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Inserts one (vector, record) pair, returning the shared row index.
    ///
    /// The vector must already be unit-normalized (see [`normalize`]); the
    /// index and the store are updated in the same call so their row
    /// sequences always agree.
    pub fn insert(&mut self, vector: &[f32], record: EssayRecord) -> Result<usize, CorpusError> {
        let row = self.index.insert(vector)?;
        let meta_row = self.metadata.append(record);
        debug_assert_eq!(row, meta_row);
        Ok(row)
    }

    /// Returns the record at `row`.
    pub fn record(&self, row: usize) -> Result<&EssayRecord, CorpusError> {
        self.metadata.get(row)
    }

    /// Returns the `min(k, count)` nearest rows to `query`, ascending by
    /// squared-L2 distance.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, CorpusError> {
        self.index.search(query, k)
    }

    pub(crate) fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub(crate) fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    pub(crate) fn from_parts(
        index: VectorIndex,
        metadata: MetadataStore,
    ) -> Result<Self, CorpusError> {
        if index.count() != metadata.count() {
            return Err(CorpusError::SnapshotMismatch {
                index_rows: index.count(),
                metadata_rows: metadata.count(),
            });
        }
        Ok(Self { index, metadata })
    }
}
