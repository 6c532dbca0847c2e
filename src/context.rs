use std::sync::Arc;

use crate::config::AppConfig;
use crate::infra::openai::OpenAiClient;
use crate::services::CompletionProvider;

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    /// `None` when no credential is configured; generation then stays offline.
    pub completion: Option<Arc<dyn CompletionProvider>>,
}

impl AppContext {
    pub fn new(config: AppConfig, completion: Option<Arc<dyn CompletionProvider>>) -> Self {
        Self { config, completion }
    }

    /// Wires the HTTP provider when the config carries a credential.
    pub fn from_config(config: AppConfig) -> Self {
        let completion = config.api_key.clone().map(|key| {
            Arc::new(OpenAiClient::new(key, config.provider.clone())) as Arc<dyn CompletionProvider>
        });
        Self::new(config, completion)
    }
}
