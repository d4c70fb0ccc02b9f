use std::sync::Arc;

use serde_json::json;

use super::{RetrievalError, Retriever};
use crate::corpus::{normalize, Corpus, EssayRecord};
use crate::embedding::mock::{FixtureEmbedder, HashEmbedder};
use crate::embedding::EmbeddingClient;

fn record(essay: &str) -> EssayRecord {
    match json!({ "essay": essay }) {
        serde_json::Value::Object(map) => EssayRecord::from(map),
        _ => unreachable!(),
    }
}

fn reference_corpus() -> Arc<Corpus> {
    let mut corpus = Corpus::new(2);
    for (raw, name) in [
        ([1.0f32, 0.0], "right"),
        ([0.0, 1.0], "up"),
        ([0.9, 0.1], "mostly right"),
    ] {
        let mut v = raw.to_vec();
        normalize(&mut v).unwrap();
        corpus.insert(&v, record(name)).unwrap();
    }
    Arc::new(corpus)
}

#[tokio::test]
async fn retrieve_returns_nearest_first() {
    let corpus = reference_corpus();
    let embedder = FixtureEmbedder::new().with("query essay", vec![1.0, 0.0]);
    let retriever = Retriever::new(corpus, embedder);

    let results = retriever.retrieve("query essay", 2).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].record.text_column("essay"), Some("right"));
    assert_eq!(results[1].record.text_column("essay"), Some("mostly right"));
    assert!(results[0].distance <= results[1].distance);
}

#[tokio::test]
async fn retrieve_empty_corpus_fails_fast() {
    let corpus = Arc::new(Corpus::new(2));
    // A fixture with no registered vectors would also fail, proving the
    // corpus check happens before any embedding call.
    let retriever = Retriever::new(corpus, FixtureEmbedder::new());

    let err = retriever.retrieve("anything", 2).await.unwrap_err();
    assert!(matches!(err, RetrievalError::EmptyCorpus));
}

#[tokio::test]
async fn retrieve_zero_k_is_invalid() {
    let retriever = Retriever::new(reference_corpus(), FixtureEmbedder::new());
    let err = retriever.retrieve("anything", 0).await.unwrap_err();
    assert!(matches!(err, RetrievalError::InvalidK { k: 0 }));
}

#[tokio::test]
async fn retrieve_returns_fewer_when_corpus_is_small() {
    let mut corpus = Corpus::new(2);
    for raw in [[1.0f32, 0.0], [0.0, 1.0]] {
        let mut v = raw.to_vec();
        normalize(&mut v).unwrap();
        corpus.insert(&v, record("e")).unwrap();
    }
    let embedder = FixtureEmbedder::new().with("q", vec![1.0, 0.0]);
    let retriever = Retriever::new(Arc::new(corpus), embedder);

    let results = retriever.retrieve("q", 5).await.unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn retrieve_is_deterministic_for_identical_queries() {
    let dim = 16;
    let embedder = HashEmbedder::new(dim);

    let mut corpus = Corpus::new(dim);
    for i in 0..6 {
        let mut v = embedder.embed(&format!("reference {i}")).await.unwrap();
        normalize(&mut v).unwrap();
        corpus.insert(&v, record(&format!("reference {i}"))).unwrap();
    }
    let retriever = Retriever::new(Arc::new(corpus), embedder);

    let first = retriever.retrieve("the query", 3).await.unwrap();
    let second = retriever.retrieve("the query", 3).await.unwrap();

    let rows = |r: &super::RetrievalResult| -> Vec<Option<String>> {
        r.iter()
            .map(|h| h.record.text_column("essay").map(str::to_string))
            .collect()
    };
    assert_eq!(rows(&first), rows(&second));
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.distance, b.distance);
    }
}

#[tokio::test]
async fn retrieve_rejects_zero_norm_query() {
    let corpus = reference_corpus();
    let embedder = FixtureEmbedder::new().with("zero", vec![0.0, 0.0]);
    let retriever = Retriever::new(corpus, embedder);

    let err = retriever.retrieve("zero", 1).await.unwrap_err();
    assert!(matches!(
        err,
        RetrievalError::Corpus(crate::corpus::CorpusError::ZeroNorm { .. })
    ));
}
