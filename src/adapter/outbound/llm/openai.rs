//! OpenAI Chat Completions client.
//!
//! Implements the [`Llm`] trait for the opportunity validator's
//! same-event check.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::infrastructure::config::LlmConfig;
use crate::port::Llm;

/// OpenAI Chat Completions API endpoint.
const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI API client.
#[derive(Debug)]
pub struct OpenAi {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: usize,
    temperature: f64,
}

impl OpenAi {
    /// Create a new OpenAI client with explicit configuration.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: usize,
        temperature: f64,
    ) -> Self {
        Self {
            client: Client::new(),
            api_url: API_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
            temperature,
        }
    }

    /// Create a client from validator settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`](crate::error::ConfigError::MissingField)
    /// when no API key is configured.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(crate::error::ConfigError::MissingField {
                field: "OPENAI_API_KEY",
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                Client::new()
            });

        Ok(Self {
            client,
            api_url: API_URL.to_string(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Point the client at a different Chat Completions endpoint.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    fn request(&self, prompt: &str) -> Request {
        Request {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![
                Message {
                    role: "system",
                    content: "You check whether two prediction markets resolve on the same event. \
                              Answer with a single word."
                        .to_string(),
                },
                Message {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
        }
    }
}

#[derive(Serialize)]
struct Request {
    model: String,
    max_tokens: usize,
    temperature: f64,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct Response {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl Response {
    fn into_text(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Parse("OpenAI response has no message content".to_string()))
    }
}

#[async_trait]
impl Llm for OpenAi {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&self.request(prompt))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Connection(e.to_string()))?
            .json::<Response>()
            .await?;

        response.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_model_settings_and_prompt() {
        let client = OpenAi::new("key", "gpt-4o-mini", 16, 0.1);
        let json = serde_json::to_value(client.request("Same event?")).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 16);
        assert_eq!(json["temperature"], 0.1);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Same event?");
    }

    #[test]
    fn response_text_is_first_choice() {
        let json = r#"{
            "id": "chatcmpl-123",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "YES"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "NO"}, "finish_reason": "stop"}
            ]
        }"#;
        let response: Response = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_text().unwrap(), "YES");
    }

    #[test]
    fn empty_choices_is_an_error() {
        let response: Response = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(response.into_text(), Err(Error::Parse(_))));

        let response: Response =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(response.into_text().is_err());
    }

    #[test]
    fn from_config_requires_key() {
        let config = LlmConfig::default();
        assert!(OpenAi::from_config(&config).is_err());

        let config = LlmConfig {
            api_key: Some("sk-test".into()),
            ..LlmConfig::default()
        };
        let client = OpenAi::from_config(&config).unwrap();
        assert_eq!(client.model, "gpt-4o-mini");
        assert_eq!(client.api_url, API_URL);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let client =
            OpenAi::new("key", "gpt-4o-mini", 16, 0.1).with_api_url("http://127.0.0.1:9/v1");
        assert!(client.complete("x").await.is_err());
    }
}
