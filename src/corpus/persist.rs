//! Snapshot persistence for the corpus.
//!
//! Two linked artifacts, always written and read as a pair:
//!
//! - index blob: `RBIX` magic, format version, dimension, row count, then
//!   row-major little-endian f32 data;
//! - metadata blob: JSON lines, one record per index row.
//!
//! Writes land in temp files beside the destination and are renamed into
//! place, so a concurrently starting server never observes a partial
//! snapshot. Loading a pair whose row counts disagree fails with
//! [`CorpusError::SnapshotMismatch`] and is fatal at startup.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::error::CorpusError;
use super::index::VectorIndex;
use super::store::{EssayRecord, MetadataStore};
use super::Corpus;

const INDEX_MAGIC: &[u8; 4] = b"RBIX";
const INDEX_FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = 4 + 4 + 4 + 8;

impl Corpus {
    /// Persists the corpus as a linked (index, metadata) artifact pair.
    pub fn save(&self, index_path: &Path, metadata_path: &Path) -> Result<(), CorpusError> {
        write_atomic(index_path, &encode_index(self.index()))?;

        let mut buf = Vec::new();
        for record in self.metadata().iter() {
            // serializing a Map<String, Value> cannot fail; keep the
            // propagation anyway so format changes stay honest.
            let line =
                serde_json::to_vec(record).map_err(|source| CorpusError::CorruptMetadata {
                    path: metadata_path.to_path_buf(),
                    line: 0,
                    source,
                })?;
            buf.extend_from_slice(&line);
            buf.push(b'\n');
        }
        write_atomic(metadata_path, &buf)
    }

    /// Loads a corpus from a linked (index, metadata) artifact pair.
    pub fn load(index_path: &Path, metadata_path: &Path) -> Result<Self, CorpusError> {
        let index_bytes = fs::read(index_path).map_err(|source| CorpusError::Io {
            path: index_path.to_path_buf(),
            source,
        })?;
        let index = decode_index(index_path, &index_bytes)?;

        let metadata_bytes = fs::read(metadata_path).map_err(|source| CorpusError::Io {
            path: metadata_path.to_path_buf(),
            source,
        })?;
        let metadata = decode_metadata(metadata_path, &metadata_bytes)?;

        Corpus::from_parts(index, metadata)
    }
}

fn encode_index(index: &VectorIndex) -> Vec<u8> {
    let flat = index.as_flat();
    let mut buf = Vec::with_capacity(HEADER_LEN + flat.len() * 4);
    buf.extend_from_slice(INDEX_MAGIC);
    buf.extend_from_slice(&INDEX_FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&(index.dim() as u32).to_le_bytes());
    buf.extend_from_slice(&(index.count() as u64).to_le_bytes());
    buf.extend_from_slice(bytemuck::cast_slice(flat));
    buf
}

fn decode_index(path: &Path, bytes: &[u8]) -> Result<VectorIndex, CorpusError> {
    let corrupt = |reason: String| CorpusError::CorruptIndex {
        path: path.to_path_buf(),
        reason,
    };

    if bytes.len() < HEADER_LEN {
        return Err(corrupt(format!(
            "truncated header: {} bytes, need {HEADER_LEN}",
            bytes.len()
        )));
    }
    if &bytes[0..4] != INDEX_MAGIC {
        return Err(corrupt("bad magic".to_string()));
    }

    let version = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
    if version != INDEX_FORMAT_VERSION {
        return Err(corrupt(format!(
            "unsupported format version {version} (expected {INDEX_FORMAT_VERSION})"
        )));
    }

    let dim = u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize;
    let count = u64::from_le_bytes(bytes[12..20].try_into().unwrap()) as usize;
    if dim == 0 {
        return Err(corrupt("zero dimension".to_string()));
    }

    let payload = &bytes[HEADER_LEN..];
    let expected = dim
        .checked_mul(count)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| corrupt(format!("implausible geometry: dim {dim}, count {count}")))?;
    if payload.len() != expected {
        return Err(corrupt(format!(
            "payload is {} bytes, header implies {expected}",
            payload.len()
        )));
    }

    // The blob may not be 4-byte aligned after fs::read; decode per row
    // instead of casting the whole slice.
    let mut data = Vec::with_capacity(dim * count);
    for chunk in payload.chunks_exact(4) {
        data.push(f32::from_le_bytes(chunk.try_into().unwrap()));
    }

    Ok(VectorIndex::from_flat(dim, data))
}

fn decode_metadata(path: &Path, bytes: &[u8]) -> Result<MetadataStore, CorpusError> {
    let mut records = Vec::new();
    for (i, line) in bytes.split(|&b| b == b'\n').enumerate() {
        if line.is_empty() {
            continue;
        }
        let record: EssayRecord =
            serde_json::from_slice(line).map_err(|source| CorpusError::CorruptMetadata {
                path: path.to_path_buf(),
                line: i + 1,
                source,
            })?;
        records.push(record);
    }
    Ok(MetadataStore::from_records(records))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CorpusError> {
    let io_err = |source: std::io::Error| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
        Some(dir) => NamedTempFile::new_in(dir),
        None => NamedTempFile::new(),
    }
    .map_err(io_err)?;

    tmp.write_all(bytes).map_err(io_err)?;
    tmp.flush().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
