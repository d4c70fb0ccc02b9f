use serde::{Deserialize, Serialize};

use super::{flatten_whitespace, EmbeddingClient, EmbeddingError};

/// OpenAI-compatible embeddings client.
///
/// Posts to `{base_url}/embeddings`. Works against the hosted API or any
/// compatible self-hosted endpoint; the request timeout comes from the
/// `reqwest::Client` handed in at construction.
#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    /// Creates a client for `base_url` using `model`.
    pub fn new(client: reqwest::Client, base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client,
            url: format!("{}/embeddings", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Returns the configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl EmbeddingClient for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let input = flatten_whitespace(text);
        let request = EmbeddingRequest {
            model: &self.model,
            input: [input.as_str()],
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| EmbeddingError::RequestFailed { source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbeddingResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        let mut data = parsed.data;
        match data.pop() {
            Some(datum) if !datum.embedding.is_empty() => Ok(datum.embedding),
            _ => Err(EmbeddingError::EmptyResponse),
        }
    }
}
