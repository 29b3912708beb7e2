use async_trait::async_trait;

use crate::clients::openai_client::{self, OpenAIError, OpenAISettings};

#[async_trait]
pub trait OpenAIClient: Send + Sync {
    async fn generate_prompt(&self, prompt: &str, prompt_type: &str)
    -> Result<String, OpenAIError>;
}

pub struct OpenAIService {
    settings: OpenAISettings,
}

impl OpenAIService {
    pub fn new(settings: OpenAISettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl OpenAIClient for OpenAIService {
    async fn generate_prompt(
        &self,
        prompt: &str,
        prompt_type: &str,
    ) -> Result<String, OpenAIError> {
        openai_client::generate_openai_prompt(prompt, prompt_type, &self.settings).await
    }
}
