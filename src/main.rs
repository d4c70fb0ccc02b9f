//! Rubricate HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use rubricate::config::Config;
use rubricate::corpus::Corpus;
use rubricate::embedding::OpenAiEmbedder;
use rubricate::gateway::{create_router_with_state, HandlerState};
use rubricate::generation::OpenAiChatGenerator;
use rubricate::pipeline::{EssayGrader, GraderOptions};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate_corpus_paths()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        chat_model = %config.chat_model,
        embedding_model = %config.embedding_model,
        "rubricate starting"
    );

    // Load-or-fail: a missing or mismatched snapshot pair must prevent
    // the service from becoming ready.
    let corpus = Corpus::load(&config.index_path, &config.metadata_path)?;
    tracing::info!(
        rows = corpus.count(),
        dim = corpus.dim(),
        "reference corpus loaded"
    );
    let corpus = Arc::new(corpus);

    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;
    let embedder = OpenAiEmbedder::new(
        http.clone(),
        &config.openai_base_url,
        &config.openai_api_key,
        &config.embedding_model,
    );
    let generator = OpenAiChatGenerator::new(
        http,
        &config.openai_base_url,
        &config.openai_api_key,
        &config.chat_model,
    );

    let options = GraderOptions {
        top_k: config.top_k,
        repair: config.repair,
    };
    let grader = Arc::new(EssayGrader::new(corpus, embedder, generator, options));

    let app = create_router_with_state(HandlerState::new(grader), &config.allowed_origin);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl-c"),
        _ = terminate => tracing::info!("received SIGTERM"),
    }
}
