pub mod fake;
pub mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
}

/// Provider seam for everything that talks to a language model: response
/// generation and the cheating judge. Implementations must be shareable
/// across sequential calls.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<LlmResponse>;

    fn provider_name(&self) -> &'static str;
}
