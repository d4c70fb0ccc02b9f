use thiserror::Error;

#[derive(Debug, Error)]
/// Errors from the remote text-generation service.
pub enum GenerationError {
    /// The HTTP request failed (connect, timeout, TLS, ...).
    #[error("generation request failed: {source}")]
    RequestFailed {
        /// Underlying transport error.
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("generation service returned status {status}: {body}")]
    BadStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, for operator inspection.
        body: String,
    },

    /// The response did not match the expected shape.
    #[error("malformed generation response: {reason}")]
    MalformedResponse {
        /// What was missing or wrong.
        reason: String,
    },

    /// The model produced no content.
    #[error("generation service returned an empty completion")]
    EmptyCompletion,
}
