//! AI service integration for answering questions
//!
//! Provides the service seam between the `/ask` proxy and the upstream
//! generative-language API, plus a mock for tests.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiAnswerClient;
pub use mock::MockAnswerClient;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Answer an already validated, trimmed question with the given model.
    async fn answer(&self, question: &str, model: &str) -> Result<String>;
}
