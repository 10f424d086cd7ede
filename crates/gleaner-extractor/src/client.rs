//! Oracle client implementation

use crate::error::ExtractorError;
use crate::parser::{parse_basic_response, parse_detailed_response, parse_plain_summary};
use crate::prompt::PromptBuilder;
use crate::OracleConfig;
use gleaner_domain::traits::{LlmProvider, Prompt};
use gleaner_domain::{BasicFields, DetailedFields};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Issues extraction requests to the oracle and decodes the replies
pub struct OracleClient<L: LlmProvider> {
    llm: L,
    config: OracleConfig,
}

impl<L: LlmProvider> OracleClient<L> {
    /// Create a new oracle client
    pub fn new(llm: L, config: OracleConfig) -> Self {
        Self { llm, config }
    }

    /// The underlying provider
    pub fn llm(&self) -> &L {
        &self.llm
    }

    /// Active configuration
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Extract title, short summary and publish timestamp
    pub async fn extract_basic(&self, content: &str) -> Result<BasicFields, ExtractorError> {
        let prompt = PromptBuilder::new(self.truncate(content)).basic();
        let response = self.call_llm(&prompt).await?;

        parse_basic_response(&response).map_err(|failure| {
            warn!(kind = ?failure.kind, "Basic response did not parse: {}", failure.detail);
            ExtractorError::Parse(failure)
        })
    }

    /// Extract a long summary and keyword list
    ///
    /// With `retained_keywords` unset the oracle is asked for JSON and the
    /// keywords come from its reply. Otherwise the reply is a plain-text
    /// summary and the retained keywords are returned unchanged alongside it.
    pub async fn extract_detailed(
        &self,
        content: &str,
        retained_keywords: Option<&[String]>,
    ) -> Result<DetailedFields, ExtractorError> {
        let prompt = PromptBuilder::new(self.truncate(content)).detailed(retained_keywords);
        let response = self.call_llm(&prompt).await?;

        let parsed = match retained_keywords {
            None => parse_detailed_response(&response),
            Some(keywords) => parse_plain_summary(&response).map(|long_summary| DetailedFields {
                long_summary,
                keywords: keywords.to_vec(),
            }),
        };

        parsed.map_err(|failure| {
            warn!(kind = ?failure.kind, "Detailed response did not parse: {}", failure.detail);
            ExtractorError::Parse(failure)
        })
    }

    async fn call_llm(&self, prompt: &Prompt) -> Result<String, ExtractorError> {
        debug!(
            model = self.llm.model_name(),
            "Prompt length: {} chars",
            prompt.system.len() + prompt.user.len()
        );

        let response = timeout(self.config.timeout(), self.llm.complete(prompt))
            .await
            .map_err(|_| ExtractorError::Timeout(self.config.timeout_secs))?
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        debug!("LLM response length: {} chars", response.len());
        Ok(response)
    }

    fn truncate<'a>(&self, content: &'a str) -> &'a str {
        match content.char_indices().nth(self.config.max_content_chars) {
            Some((idx, _)) => {
                debug!(
                    limit = self.config.max_content_chars,
                    "Content truncated before prompting"
                );
                &content[..idx]
            }
            None => content,
        }
    }
}
