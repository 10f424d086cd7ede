//! OpenAI-compatible chat completions provider

use crate::transport::{build_client, post_json_with_retries};
use crate::LlmError;
use async_trait::async_trait;
use gleaner_domain::traits::{LlmProvider, Prompt};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default API base URL
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of transport attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Provider for `/v1/chat/completions` endpoints
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

impl OpenAiProvider {
    /// Create a provider for `model` at `endpoint`, authenticating with `api_key`
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Config("API key is empty".to_string()));
        }
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a provider reading the key from the environment variable `var`
    pub fn from_env(model: impl Into<String>, var: &str) -> Result<Self, LlmError> {
        let key = std::env::var(var)
            .map_err(|_| LlmError::Config(format!("Environment variable {} is not set", var)))?;
        Self::new(DEFAULT_ENDPOINT, model, key)
    }

    /// Set the maximum number of transport attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Replace the client request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    type Error = LlmError;

    async fn complete(&self, prompt: &Prompt) -> Result<String, Self::Error> {
        let url = format!("{}/v1/chat/completions", self.endpoint);
        let request = CompletionRequest {
            model: &self.model,
            temperature: 0.0,
            messages: vec![
                Message { role: "system", content: &prompt.system },
                Message { role: "user", content: &prompt.user },
            ],
        };

        let response: CompletionResponse = post_json_with_retries(
            &self.client,
            &url,
            Some(&self.api_key),
            &request,
            &self.model,
            self.max_retries,
        )
        .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("Response has no message content".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_key() {
        let result = OpenAiProvider::new(DEFAULT_ENDPOINT, DEFAULT_MODEL, "  ");
        assert!(matches!(result, Err(LlmError::Config(_))));
    }

    #[test]
    fn test_missing_env_key() {
        let result = OpenAiProvider::from_env(DEFAULT_MODEL, "GLEANER_TEST_KEY_THAT_IS_NOT_SET");
        assert!(matches!(result, Err(LlmError::Config(_))));
    }

    #[test]
    fn test_response_decoding() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}]}"#;
        let decoded: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(decoded.choices[0].message.content.as_deref(), Some("hi"));
    }

    #[test]
    fn test_request_is_deterministic() {
        let request = CompletionRequest {
            model: "m",
            temperature: 0.0,
            messages: vec![Message { role: "system", content: "s" }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["temperature"], 0.0);
    }
}
