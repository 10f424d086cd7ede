//! Provider selected by the configuration file.

use crate::config::{LlmSettings, ProviderKind};
use crate::error::Result;
use async_trait::async_trait;
use gleaner_domain::traits::{LlmProvider, Prompt};
use gleaner_llm::{LlmError, OllamaProvider, OpenAiProvider};
use std::time::Duration;

/// Either backend behind one `LlmProvider` implementation.
pub enum ConfiguredProvider {
    /// Local Ollama server
    Ollama(OllamaProvider),
    /// OpenAI-compatible API
    OpenAi(OpenAiProvider),
}

impl ConfiguredProvider {
    /// Build the provider named in `settings`.
    ///
    /// For OpenAI the key is read from the environment variable named by
    /// `api_key_env`; a missing variable is a configuration error.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let timeout = Duration::from_secs(settings.request_timeout_secs);
        let provider = match settings.provider {
            ProviderKind::Ollama => {
                let provider = match &settings.endpoint {
                    Some(endpoint) => OllamaProvider::new(endpoint.as_str(), settings.model.as_str())?,
                    None => OllamaProvider::default_endpoint(settings.model.as_str())?,
                };
                ConfiguredProvider::Ollama(
                    provider
                        .with_timeout(timeout)?
                        .with_max_retries(settings.max_retries),
                )
            }
            ProviderKind::OpenAi => {
                let provider = match &settings.endpoint {
                    Some(endpoint) => {
                        let key = std::env::var(&settings.api_key_env).map_err(|_| {
                            LlmError::Config(format!(
                                "Environment variable {} is not set",
                                settings.api_key_env
                            ))
                        })?;
                        OpenAiProvider::new(endpoint.as_str(), settings.model.as_str(), key)?
                    }
                    None => OpenAiProvider::from_env(settings.model.as_str(), &settings.api_key_env)?,
                };
                ConfiguredProvider::OpenAi(
                    provider
                        .with_timeout(timeout)?
                        .with_max_retries(settings.max_retries),
                )
            }
        };
        Ok(provider)
    }
}

#[async_trait]
impl LlmProvider for ConfiguredProvider {
    type Error = LlmError;

    async fn complete(&self, prompt: &Prompt) -> std::result::Result<String, LlmError> {
        match self {
            ConfiguredProvider::Ollama(p) => p.complete(prompt).await,
            ConfiguredProvider::OpenAi(p) => p.complete(prompt).await,
        }
    }

    fn model_name(&self) -> &str {
        match self {
            ConfiguredProvider::Ollama(p) => p.model_name(),
            ConfiguredProvider::OpenAi(p) => p.model_name(),
        }
    }
}
