pub mod ollama;

use anyhow::Result;

/// Text-generation service. One prompt in, raw text out; `Err` is a transport failure.
#[async_trait::async_trait]
pub trait Llm: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
