use super::error::CorpusError;

/// Flat nearest-neighbor index over unit-normalized embedding vectors.
///
/// Brute-force squared-Euclidean search, which over unit vectors orders
/// identically to cosine similarity. Rows are assigned in insertion order
/// and are permanent: there is no delete or update, so row `i` can be used
/// as a stable key into parallel storage.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    dim: usize,
    // Row-major, `dim` floats per row.
    data: Vec<f32>,
}

/// One search hit: stored row plus its squared-L2 distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Row index assigned at insertion.
    pub row: usize,
    /// Squared Euclidean distance (smaller is more similar).
    pub distance: f32,
}

impl VectorIndex {
    /// Creates an empty index for vectors of dimension `dim`.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            data: Vec::new(),
        }
    }

    /// Returns the fixed vector dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the number of stored rows.
    pub fn count(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    /// Appends a vector, returning its permanent row index.
    pub fn insert(&mut self, vector: &[f32]) -> Result<usize, CorpusError> {
        if vector.len() != self.dim {
            return Err(CorpusError::DimensionMismatch {
                expected: self.dim,
                actual: vector.len(),
            });
        }
        let row = self.count();
        self.data.extend_from_slice(vector);
        Ok(row)
    }

    /// Returns the stored vector at `row`.
    pub fn row(&self, row: usize) -> Result<&[f32], CorpusError> {
        if row >= self.count() {
            return Err(CorpusError::RowOutOfRange {
                row,
                count: self.count(),
            });
        }
        let start = row * self.dim;
        Ok(&self.data[start..start + self.dim])
    }

    /// Returns the `min(k, count)` nearest rows to `query`, ascending by
    /// squared-L2 distance. Ties break toward the lower row index, which
    /// keeps results deterministic for identical corpora and queries.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, CorpusError> {
        if query.len() != self.dim {
            return Err(CorpusError::DimensionMismatch {
                expected: self.dim,
                actual: query.len(),
            });
        }

        let mut neighbors: Vec<Neighbor> = (0..self.count())
            .map(|row| {
                let start = row * self.dim;
                let stored = &self.data[start..start + self.dim];
                let distance = squared_l2(query, stored);
                Neighbor { row, distance }
            })
            .collect();

        neighbors.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.row.cmp(&b.row))
        });
        neighbors.truncate(k);
        Ok(neighbors)
    }

    /// Borrow of the raw row-major storage (persistence only).
    pub(crate) fn as_flat(&self) -> &[f32] {
        &self.data
    }

    /// Rebuilds an index from row-major storage (persistence only).
    pub(crate) fn from_flat(dim: usize, data: Vec<f32>) -> Self {
        debug_assert!(dim > 0 && data.len() % dim == 0);
        Self { dim, data }
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
