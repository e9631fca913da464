pub mod gemini;

use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use async_trait::async_trait;

pub use gemini::GeminiClient;

/// Text-generation collaborator: one prompt in, one string out.
#[async_trait]
pub trait LLMClient {
    async fn generate(&self, config: &LLMConfig, prompt: &str) -> Result<String>;
}
