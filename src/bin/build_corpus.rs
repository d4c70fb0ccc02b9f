//! Offline corpus builder.
//!
//! Reads a headered CSV of reference essays, embeds each row, and
//! persists the (index, metadata) snapshot pair at the configured paths.
//!
//! Usage: `build-corpus <essays.csv>` with the same `RUBRICATE_*` /
//! `OPENAI_API_KEY` environment as the server.

use std::path::PathBuf;

use anyhow::{bail, Context};

use rubricate::builder::CorpusBuilder;
use rubricate::config::Config;
use rubricate::constants::DEFAULT_EMBEDDING_DIM;
use rubricate::embedding::OpenAiEmbedder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let Some(csv_path) = args.next().map(PathBuf::from) else {
        bail!("usage: build-corpus <essays.csv>");
    };

    let config = Config::from_env()?;
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;
    let embedder = OpenAiEmbedder::new(
        http,
        &config.openai_base_url,
        &config.openai_api_key,
        &config.embedding_model,
    );

    tracing::info!(csv = %csv_path.display(), "building corpus");
    let builder = CorpusBuilder::new(embedder, DEFAULT_EMBEDDING_DIM);
    let corpus = builder
        .build_from_path(&csv_path)
        .await
        .with_context(|| format!("building corpus from {}", csv_path.display()))?;

    corpus
        .save(&config.index_path, &config.metadata_path)
        .context("persisting corpus snapshot pair")?;

    tracing::info!(
        rows = corpus.count(),
        index = %config.index_path.display(),
        metadata = %config.metadata_path.display(),
        "corpus snapshot written"
    );
    Ok(())
}
