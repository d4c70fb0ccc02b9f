use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{GenerationClient, GenerationError};

/// Scripted generator: returns queued responses in FIFO order.
///
/// Cloning shares the queue, so a test can keep a handle while the
/// pipeline under test holds another. An exhausted queue fails with
/// [`GenerationError::EmptyCompletion`], which doubles as the "model went
/// silent" failure mode.
#[derive(Clone, Default)]
pub struct MockGenerator {
    script: Arc<Mutex<VecDeque<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockGenerator {
    /// Creates a generator with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one response.
    pub fn push(&self, response: impl Into<String>) {
        self.script.lock().push_back(response.into());
    }

    /// Queues one response, builder style.
    pub fn with(self, response: impl Into<String>) -> Self {
        self.push(response);
        self
    }

    /// Returns every prompt seen so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Number of generation calls made.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

impl GenerationClient for MockGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, GenerationError> {
        self.prompts.lock().push(prompt.to_string());
        self.script
            .lock()
            .pop_front()
            .ok_or(GenerationError::EmptyCompletion)
    }
}
