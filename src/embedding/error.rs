use thiserror::Error;

#[derive(Debug, Error)]
/// Errors from the remote embedding service.
pub enum EmbeddingError {
    /// The HTTP request failed (connect, timeout, TLS, ...).
    #[error("embedding request failed: {source}")]
    RequestFailed {
        /// Underlying transport error.
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("embedding service returned status {status}: {body}")]
    BadStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, for operator inspection.
        body: String,
    },

    /// The response did not match the expected shape.
    #[error("malformed embedding response: {reason}")]
    MalformedResponse {
        /// What was missing or wrong.
        reason: String,
    },

    /// The service returned no embedding for the input.
    #[error("embedding service returned no vectors")]
    EmptyResponse,
}

impl EmbeddingError {
    /// `true` for failures worth retrying at a higher level (transport and
    /// server-side errors), `false` for client-side mistakes.
    pub fn is_transient(&self) -> bool {
        match self {
            EmbeddingError::RequestFailed { .. } => true,
            EmbeddingError::BadStatus { status, .. } => *status >= 500 || *status == 429,
            EmbeddingError::MalformedResponse { .. } | EmbeddingError::EmptyResponse => false,
        }
    }
}
