//! Structured text generation.
//!
//! The model is a black box: prompt in, raw text out. Schema conformance
//! is *advisory* (the prompt embeds an example object to imitate), so the
//! raw output always goes through [`crate::schema`] before anything
//! downstream trusts it.

mod error;
pub mod openai;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::GenerationError;
pub use openai::OpenAiChatGenerator;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockGenerator;

/// Prompt-to-text client interface.
pub trait GenerationClient: Send + Sync {
    /// Executes `prompt` and returns the raw completion text.
    fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send;
}
