use async_trait::async_trait;

use crate::error::ProviderError;

/// External text-completion service: takes an instruction prompt and returns raw generated text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}
