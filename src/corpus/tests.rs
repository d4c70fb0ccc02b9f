use serde_json::json;

use super::{normalize, Corpus, CorpusError, EssayRecord};

fn record(essay: &str, score: f64) -> EssayRecord {
    let value = json!({ "essay": essay, "domain1_score": score });
    match value {
        serde_json::Value::Object(map) => EssayRecord::from(map),
        _ => unreachable!(),
    }
}

fn three_row_corpus() -> Corpus {
    // Already unit-length apart from the third row, which normalize fixes.
    let mut corpus = Corpus::new(2);
    let rows: [[f32; 2]; 3] = [[1.0, 0.0], [0.0, 1.0], [0.9, 0.1]];
    for (i, raw) in rows.iter().enumerate() {
        let mut v = raw.to_vec();
        normalize(&mut v).unwrap();
        corpus
            .insert(&v, record(&format!("essay {i}"), i as f64))
            .unwrap();
    }
    corpus
}

#[test]
fn normalize_produces_unit_norm() {
    let mut v = vec![3.0, 4.0];
    normalize(&mut v).unwrap();
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5);
}

#[test]
fn normalize_rejects_zero_vector() {
    let mut v = vec![0.0; 8];
    let err = normalize(&mut v).unwrap_err();
    assert!(matches!(err, CorpusError::ZeroNorm { .. }));
    // The input must not have been poisoned with NaN on the way out.
    assert!(v.iter().all(|x| !x.is_nan()));
}

#[test]
fn insert_assigns_monotonic_rows_in_both_structures() {
    let mut corpus = Corpus::new(2);
    for i in 0..5 {
        let mut v = vec![1.0, i as f32];
        normalize(&mut v).unwrap();
        let row = corpus.insert(&v, record(&format!("e{i}"), 0.0)).unwrap();
        assert_eq!(row, i);
    }

    assert_eq!(corpus.count(), 5);
    for i in 0..5 {
        let rec = corpus.record(i).unwrap();
        assert_eq!(rec.text_column("essay"), Some(format!("e{i}").as_str()));
    }
}

#[test]
fn insert_rejects_wrong_dimension() {
    let mut corpus = Corpus::new(2);
    let err = corpus.insert(&[1.0, 0.0, 0.0], record("e", 0.0)).unwrap_err();
    assert!(matches!(
        err,
        CorpusError::DimensionMismatch {
            expected: 2,
            actual: 3
        }
    ));
    // A rejected insert must not grow either side.
    assert_eq!(corpus.count(), 0);
}

#[test]
fn record_out_of_range_is_an_error() {
    let corpus = three_row_corpus();
    let err = corpus.record(3).unwrap_err();
    assert!(matches!(err, CorpusError::RowOutOfRange { row: 3, count: 3 }));
}

#[test]
fn search_nearest_two_of_three() {
    let corpus = three_row_corpus();
    let hits = corpus.search(&[1.0, 0.0], 2).unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].row, 0);
    assert_eq!(hits[1].row, 2);
    assert!(hits[0].distance <= hits[1].distance);
}

#[test]
fn search_caps_k_at_corpus_size() {
    let mut corpus = Corpus::new(2);
    for i in 0..2 {
        let mut v = vec![1.0, i as f32];
        normalize(&mut v).unwrap();
        corpus.insert(&v, record("e", 0.0)).unwrap();
    }

    let hits = corpus.search(&[1.0, 0.0], 5).unwrap();
    assert_eq!(hits.len(), 2);
}

#[test]
fn search_distances_ascend() {
    let corpus = three_row_corpus();
    let hits = corpus.search(&[0.6, 0.8], 3).unwrap();
    assert_eq!(hits.len(), 3);
    for pair in hits.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }
}

#[test]
fn search_empty_corpus_returns_nothing() {
    let corpus = Corpus::new(2);
    let hits = corpus.search(&[1.0, 0.0], 4).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn persistence_round_trip_preserves_queries() {
    let corpus = three_row_corpus();

    let dir = tempfile::tempdir().unwrap();
    let index_path = dir.path().join("essay_index.bin");
    let metadata_path = dir.path().join("essay_metadata.jsonl");
    corpus.save(&index_path, &metadata_path).unwrap();

    let reloaded = Corpus::load(&index_path, &metadata_path).unwrap();
    assert_eq!(reloaded.count(), corpus.count());
    assert_eq!(reloaded.dim(), corpus.dim());

    let before = corpus.search(&[1.0, 0.0], 3).unwrap();
    let after = reloaded.search(&[1.0, 0.0], 3).unwrap();
    assert_eq!(before.len(), after.len());
    for (b, a) in before.iter().zip(after.iter()) {
        assert_eq!(b.row, a.row);
        assert!((b.distance - a.distance).abs() < 1e-6);
    }

    for i in 0..corpus.count() {
        assert_eq!(reloaded.record(i).unwrap(), corpus.record(i).unwrap());
    }
}

#[test]
fn load_rejects_mismatched_pair() {
    let corpus = three_row_corpus();
    let smaller = {
        let mut c = Corpus::new(2);
        c.insert(&[1.0, 0.0], record("only", 0.0)).unwrap();
        c
    };

    let dir = tempfile::tempdir().unwrap();
    let index_path = dir.path().join("index.bin");
    let metadata_path = dir.path().join("metadata.jsonl");

    // Index from the 3-row corpus, metadata from the 1-row corpus.
    corpus
        .save(&index_path, &dir.path().join("unused.jsonl"))
        .unwrap();
    smaller
        .save(&dir.path().join("unused.bin"), &metadata_path)
        .unwrap();

    let err = Corpus::load(&index_path, &metadata_path).unwrap_err();
    assert!(matches!(
        err,
        CorpusError::SnapshotMismatch {
            index_rows: 3,
            metadata_rows: 1
        }
    ));
}

#[test]
fn load_rejects_corrupt_index_blob() {
    let dir = tempfile::tempdir().unwrap();
    let index_path = dir.path().join("index.bin");
    let metadata_path = dir.path().join("metadata.jsonl");
    std::fs::write(&index_path, b"not a snapshot").unwrap();
    std::fs::write(&metadata_path, b"").unwrap();

    let err = Corpus::load(&index_path, &metadata_path).unwrap_err();
    assert!(matches!(err, CorpusError::CorruptIndex { .. }));
}

#[test]
fn load_rejects_corrupt_metadata_line() {
    let corpus = three_row_corpus();
    let dir = tempfile::tempdir().unwrap();
    let index_path = dir.path().join("index.bin");
    let metadata_path = dir.path().join("metadata.jsonl");
    corpus.save(&index_path, &metadata_path).unwrap();

    let mut text = std::fs::read_to_string(&metadata_path).unwrap();
    text.push_str("{broken\n");
    std::fs::write(&metadata_path, text).unwrap();

    let err = Corpus::load(&index_path, &metadata_path).unwrap_err();
    assert!(matches!(err, CorpusError::CorruptMetadata { line: 4, .. }));
}
