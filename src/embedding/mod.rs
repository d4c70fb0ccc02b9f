//! Embedding generation.
//!
//! The pipeline treats embedding as a pure, slow, fallible remote call:
//! text in, fixed-length vector out. [`OpenAiEmbedder`] is the production
//! client; deterministic mocks live behind the `mock` feature.

mod error;
pub mod openai;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::EmbeddingError;
pub use openai::OpenAiEmbedder;

#[cfg(any(test, feature = "mock"))]
pub use mock::{FixtureEmbedder, HashEmbedder};

/// Text-to-vector client interface.
pub trait EmbeddingClient: Send + Sync {
    /// Embeds `text` into a fixed-length vector.
    ///
    /// Implementations receive raw text; whitespace preparation is their
    /// concern (see [`flatten_whitespace`]).
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;
}

/// Replaces newlines with spaces before submission.
///
/// Embedding quality for the reference models is sensitive to raw line
/// breaks, so every outbound input goes through this first.
pub fn flatten_whitespace(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}
