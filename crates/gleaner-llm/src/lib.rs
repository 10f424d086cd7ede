//! Gleaner LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `gleaner-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Scripted, deterministic provider for tests
//! - `OllamaProvider`: Local Ollama chat API
//! - `OpenAiProvider`: OpenAI-compatible chat completions API
//!
//! # Examples
//!
//! ```
//! use gleaner_llm::MockProvider;
//! use gleaner_domain::traits::{LlmProvider, Prompt};
//!
//! # async fn demo() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.complete(&Prompt::new("system", "user")).await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod ollama;
pub mod openai;
mod transport;

use async_trait::async_trait;
use gleaner_domain::traits::{LlmProvider, Prompt};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response envelope from the provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Credentials rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider could not be configured
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// One scripted reply of the [`MockProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Return this text
    Text(String),
    /// Fail with [`LlmError::Other`]
    Error(String),
}

impl From<&str> for MockReply {
    fn from(s: &str) -> Self {
        MockReply::Text(s.to_string())
    }
}

impl From<String> for MockReply {
    fn from(s: String) -> Self {
        MockReply::Text(s)
    }
}

#[derive(Debug, Default)]
struct MockState {
    rules: Vec<(String, VecDeque<MockReply>)>,
    script: VecDeque<MockReply>,
    prompts: Vec<Prompt>,
}

/// Mock LLM provider for deterministic testing
///
/// Replies are chosen in this order:
///
/// 1. the first rule whose fragment occurs in the prompt (system or user
///    text); each rule replays its queue and then keeps repeating its last
///    reply
/// 2. the next entry of the global script
/// 3. the default response
///
/// Rules make concurrent tests deterministic: two candidates processed at the
/// same time can be told apart by their content.
///
/// # Examples
///
/// ```
/// use gleaner_llm::MockProvider;
/// use gleaner_domain::traits::{LlmProvider, Prompt};
///
/// # async fn demo() {
/// let provider = MockProvider::default()
///     .then("first")
///     .then("second");
/// let p = Prompt::new("sys", "text");
/// assert_eq!(provider.complete(&p).await.unwrap(), "first");
/// assert_eq!(provider.complete(&p).await.unwrap(), "second");
/// assert_eq!(provider.call_count(), 2);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    state: Arc<Mutex<MockState>>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            state: Arc::new(Mutex::new(MockState::default())),
            delay: None,
        }
    }

    /// Append a reply to the global script
    pub fn then(self, reply: impl Into<MockReply>) -> Self {
        self.lock().script.push_back(reply.into());
        self
    }

    /// Append a failing reply to the global script
    pub fn then_error(self, message: impl Into<String>) -> Self {
        self.lock().script.push_back(MockReply::Error(message.into()));
        self
    }

    /// Reply with `replies` (in order, last one sticky) to prompts containing `fragment`
    pub fn when(self, fragment: impl Into<String>, replies: Vec<MockReply>) -> Self {
        self.lock().rules.push((fragment.into(), replies.into()));
        self
    }

    /// Sleep before every reply (to exercise caller timeouts)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of completions requested so far
    pub fn call_count(&self) -> usize {
        self.lock().prompts.len()
    }

    /// Every prompt received, in call order
    pub fn prompts(&self) -> Vec<Prompt> {
        self.lock().prompts.clone()
    }

    /// Reset the recorded prompts
    pub fn reset_call_count(&self) {
        self.lock().prompts.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn next_reply(&self, prompt: &Prompt) -> MockReply {
        let mut state = self.lock();
        state.prompts.push(prompt.clone());

        for (fragment, replies) in state.rules.iter_mut() {
            if prompt.system.contains(fragment.as_str()) || prompt.user.contains(fragment.as_str()) {
                if replies.len() > 1 {
                    if let Some(reply) = replies.pop_front() {
                        return reply;
                    }
                }
                if let Some(reply) = replies.front() {
                    return reply.clone();
                }
            }
        }

        state
            .script
            .pop_front()
            .unwrap_or_else(|| MockReply::Text(self.default_response.clone()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn complete(&self, prompt: &Prompt) -> Result<String, Self::Error> {
        let reply = self.next_reply(prompt);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Error(message) => Err(LlmError::Other(message)),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
