//! Oracle prompts for the two extraction stages

use gleaner_domain::traits::Prompt;

const BASIC_INSTRUCTIONS: &str = r#"Extract the article title, a summary of about 150 characters, and the publication date and time from the text below.
Respond with JSON only, using the keys "title", "summary" and "published_date".
Write published_date as ISO-8601 (YYYY-MM-DDTHH:MM).
Example: {"title": "Sample title", "summary": "A short summary of the article.", "published_date": "2025-02-24T09:30"}"#;

const DETAILED_JSON_INSTRUCTIONS: &str = r#"Write a detailed summary of about 1000 characters of the article below, and pick exactly 5 important keywords for it.
Respond with JSON only, using the keys "summary" and "keywords".
Example: {"summary": "About 1000 characters of summary...", "keywords": ["keyword1", "keyword2", "keyword3", "keyword4", "keyword5"]}"#;

const DETAILED_TEXT_INSTRUCTIONS: &str =
    "Write a detailed summary of about 1000 characters of the article below.\nRespond with the summary as plain text only.";

/// Builds the system/user prompt pair for each extraction stage
///
/// The page text always goes in the user message unchanged; only the
/// instruction varies between stages.
pub struct PromptBuilder {
    content: String,
}

impl PromptBuilder {
    /// Create a prompt builder for one page
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Basic stage: title, short summary, publish timestamp as JSON
    pub fn basic(&self) -> Prompt {
        Prompt::new(BASIC_INSTRUCTIONS, self.content.as_str())
    }

    /// Detailed stage
    ///
    /// Without retained keywords the oracle is asked for JSON with a fresh
    /// keyword list. With them it is asked for plain text that uses every
    /// retained keyword verbatim.
    pub fn detailed(&self, retained_keywords: Option<&[String]>) -> Prompt {
        match retained_keywords {
            None => Prompt::new(DETAILED_JSON_INSTRUCTIONS, self.content.as_str()),
            Some(keywords) => {
                let mut system = String::from(DETAILED_TEXT_INSTRUCTIONS);
                if !keywords.is_empty() {
                    system.push_str("\nMake sure the summary includes these keywords verbatim: ");
                    system.push_str(&keywords.join(", "));
                }
                Prompt::new(system, self.content.as_str())
            }
        }
    }
}
