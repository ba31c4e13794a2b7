use crate::ollama::{OllamaClient, OllamaOptions};
use crate::openai::OpenAIClient;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::agent_api::{ChatMessage, ChatModel};
use shared::settings::AiSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Local,
    Cloud,
}

pub struct ProviderRouter {
    config: AiSettings,
}

impl ProviderRouter {
    pub fn new(config: AiSettings) -> Self {
        Self { config }
    }

    /// Cloud first when enabled, local always as the fallback.
    pub fn preference(&self) -> Vec<Provider> {
        if self.config.use_cloud {
            vec![Provider::Cloud, Provider::Local]
        } else {
            vec![Provider::Local]
        }
    }

    pub async fn generate(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let mut last_error = None;

        // Try providers in order of preference, falling back on failure
        for provider in self.preference() {
            let result = match provider {
                Provider::Local => {
                    let client = OllamaClient::new(
                        self.config.local_model.clone(),
                        OllamaOptions {
                            temperature: self.config.temperature,
                            num_predict: self.config.max_tokens,
                        },
                    );
                    client.generate(messages.clone()).await
                }
                Provider::Cloud => match OpenAIClient::from_env(
                    &self.config.cloud_model,
                    self.config.temperature,
                    self.config.max_tokens,
                ) {
                    Ok(client) => client.generate(messages.clone()).await,
                    Err(e) => Err(e),
                },
            };

            match result {
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::warn!("{:?} provider failed: {:#}", provider, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("No providers configured")))
    }
}

#[async_trait]
impl ChatModel for ProviderRouter {
    async fn generate(&self, messages: Vec<ChatMessage>) -> Result<String> {
        ProviderRouter::generate(self, messages).await
    }
}
