use super::{LlmClient, LlmResponse};
use async_trait::async_trait;
use std::sync::Mutex;

/// Scripted client for tests: returns the queued responses in order and
/// errors once the script runs out.
pub struct FakeClient {
    model: String,
    responses: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self { model: model.into(), responses: Mutex::new(Vec::new()) }
    }

    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(text.into());
        self
    }
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn complete(&self, _prompt: &str) -> anyhow::Result<LlmResponse> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            anyhow::bail!("no more scripted responses");
        }
        let text = responses.remove(0);
        Ok(LlmResponse {
            text,
            provider: "fake".to_string(),
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
