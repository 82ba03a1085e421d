//! LLM validator configuration.

use serde::Deserialize;

/// OpenAI settings for the LLM-backed opportunity validator.
///
/// The validator is enabled iff `OPENAI_API_KEY` is present.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier.
    pub model: String,
    /// Sampling temperature. Low values keep YES/NO answers stable.
    pub temperature: f64,
    /// Maximum tokens in the reply.
    pub max_tokens: usize,
    /// Bound on one completion request, in seconds.
    pub timeout_secs: u64,
    /// API key, from `OPENAI_API_KEY`.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            temperature: 0.1,
            max_tokens: 16,
            timeout_secs: 15,
            api_key: None,
        }
    }
}

impl LlmConfig {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}
