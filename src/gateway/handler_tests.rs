use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use super::{create_router_with_state, HandlerState};
use crate::corpus::{normalize, Corpus, EssayRecord};
use crate::embedding::mock::HashEmbedder;
use crate::embedding::EmbeddingClient;
use crate::generation::mock::MockGenerator;
use crate::pipeline::{EssayGrader, GraderOptions};

const DIM: usize = 16;
const ORIGIN: &str = "http://localhost:5173";

async fn seeded_corpus() -> Arc<Corpus> {
    let embedder = HashEmbedder::new(DIM);
    let mut corpus = Corpus::new(DIM);
    for i in 0..3 {
        let text = format!("reference {i}");
        let mut v = embedder.embed(&text).await.unwrap();
        normalize(&mut v).unwrap();
        let record = match json!({ "essay": text }) {
            Value::Object(map) => EssayRecord::from(map),
            _ => unreachable!(),
        };
        corpus.insert(&v, record).unwrap();
    }
    Arc::new(corpus)
}

async fn router_with(generator: MockGenerator, corpus: Arc<Corpus>) -> axum::Router {
    let grader = Arc::new(EssayGrader::new(
        corpus,
        HashEmbedder::new(DIM),
        generator,
        GraderOptions::default(),
    ));
    create_router_with_state(HandlerState::new(grader), ORIGIN)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn valid_score_json() -> String {
    json!({
        "rater1_domain1": 2.0,
        "rater2_domain1": 2.0,
        "domain1_score": 4.0,
        "rater1_trait1": 1.0,
        "rater1_trait2": 1.0,
        "rater1_trait3": 1.0,
        "rater1_trait4": 1.0,
        "rater2_trait1": 1.0,
        "rater2_trait2": 1.0,
        "rater2_trait3": 1.0,
        "rater2_trait4": 1.0
    })
    .to_string()
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = router_with(MockGenerator::new(), seeded_corpus().await).await;
    let response = app
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn ready_reports_corpus_rows() {
    let app = router_with(MockGenerator::new(), seeded_corpus().await).await;
    let response = app
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["corpus_rows"], 3);
}

#[tokio::test]
async fn score_essay_returns_score_object() {
    let generator = MockGenerator::new().with(valid_score_json());
    let app = router_with(generator, seeded_corpus().await).await;

    let response = app
        .oneshot(post_json("/score-essay", json!({ "essay": "a patient tale" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["domain1_score"], 4.0);
    assert_eq!(body.as_object().unwrap().len(), 11);
}

#[tokio::test]
async fn empty_essay_is_a_bad_request() {
    let app = router_with(MockGenerator::new(), seeded_corpus().await).await;
    let response = app
        .oneshot(post_json("/score-essay", json!({ "essay": "  " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn empty_corpus_yields_service_unavailable() {
    let app = router_with(MockGenerator::new(), Arc::new(Corpus::new(DIM))).await;
    let response = app
        .oneshot(post_json("/score-essay", json!({ "essay": "essay" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn malformed_model_output_yields_bad_gateway_with_raw_text() {
    let generator = MockGenerator::new().with("{not json");
    let app = router_with(generator, seeded_corpus().await).await;

    let response = app
        .oneshot(post_json("/score-essay", json!({ "essay": "essay" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    // The raw model output must survive into the diagnostic message.
    assert!(body["error"].as_str().unwrap().contains("{not json"));
}

#[tokio::test]
async fn feedback_endpoint_runs_clean_then_feedback() {
    let generator = MockGenerator::new().with("cleaned essay").with(
        json!({
            "Ideas": "focused",
            "Organization": "clear",
            "Style": "varied",
            "Conventions": "solid"
        })
        .to_string(),
    );
    let app = router_with(generator.clone(), seeded_corpus().await).await;

    let response = app
        .oneshot(post_json(
            "/generate-feedback",
            json!({ "essay": "raw essay" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["Ideas"], "focused");
    assert_eq!(generator.call_count(), 2);
}

#[tokio::test]
async fn failed_cleaning_yields_bad_gateway() {
    // No scripted responses: the cleaning call fails.
    let app = router_with(MockGenerator::new(), seeded_corpus().await).await;

    let response = app
        .oneshot(post_json(
            "/generate-feedback",
            json!({ "essay": "raw essay" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = router_with(MockGenerator::new(), seeded_corpus().await).await;
    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/score-essay")
                .header("origin", ORIGIN)
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let allowed = response
        .headers()
        .get("access-control-allow-origin")
        .and_then(|v| v.to_str().ok());
    assert_eq!(allowed, Some(ORIGIN));
}
